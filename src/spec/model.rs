use serde::{Deserialize, Serialize, Serializer};

use crate::foundation::error::{PlacardError, PlacardResult};
use crate::spec::color::ColorSpec;

pub const MAX_DIMENSION: u32 = 8000;
pub const FONT_SIZE_MIN_PT: f32 = 16.0;
pub const FONT_SIZE_MAX_PT: f32 = 120.0;

/// Procedural background styles, in fallback order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    Solid,
    Gradient,
    Geometric,
    Dots,
    Waves,
    Grid,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::Solid,
        Style::Gradient,
        Style::Geometric,
        Style::Dots,
        Style::Waves,
        Style::Grid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Style::Solid => "solid",
            Style::Gradient => "gradient",
            Style::Geometric => "geometric",
            Style::Dots => "dots",
            Style::Waves => "waves",
            Style::Grid => "grid",
        }
    }

    /// Unrecognized names resolve to the first style rather than failing.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .unwrap_or(Style::Solid)
    }
}

impl Serialize for Style {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_name(&String::deserialize(deserializer)?))
    }
}

/// One of the nine text anchor targets (3x3 grid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorRow {
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorColumn {
    Left,
    Center,
    Right,
}

impl TextAnchor {
    pub const ALL: [TextAnchor; 9] = [
        TextAnchor::TopLeft,
        TextAnchor::TopCenter,
        TextAnchor::TopRight,
        TextAnchor::CenterLeft,
        TextAnchor::Center,
        TextAnchor::CenterRight,
        TextAnchor::BottomLeft,
        TextAnchor::BottomCenter,
        TextAnchor::BottomRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextAnchor::TopLeft => "top-left",
            TextAnchor::TopCenter => "top-center",
            TextAnchor::TopRight => "top-right",
            TextAnchor::CenterLeft => "center-left",
            TextAnchor::Center => "center",
            TextAnchor::CenterRight => "center-right",
            TextAnchor::BottomLeft => "bottom-left",
            TextAnchor::BottomCenter => "bottom-center",
            TextAnchor::BottomRight => "bottom-right",
        }
    }

    /// Unrecognized names resolve to the first anchor rather than failing.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .unwrap_or(TextAnchor::TopLeft)
    }

    pub fn row(self) -> AnchorRow {
        match self {
            TextAnchor::TopLeft | TextAnchor::TopCenter | TextAnchor::TopRight => AnchorRow::Top,
            TextAnchor::CenterLeft | TextAnchor::Center | TextAnchor::CenterRight => {
                AnchorRow::Middle
            }
            TextAnchor::BottomLeft | TextAnchor::BottomCenter | TextAnchor::BottomRight => {
                AnchorRow::Bottom
            }
        }
    }

    pub fn column(self) -> AnchorColumn {
        match self {
            TextAnchor::TopLeft | TextAnchor::CenterLeft | TextAnchor::BottomLeft => {
                AnchorColumn::Left
            }
            TextAnchor::TopCenter | TextAnchor::Center | TextAnchor::BottomCenter => {
                AnchorColumn::Center
            }
            TextAnchor::TopRight | TextAnchor::CenterRight | TextAnchor::BottomRight => {
                AnchorColumn::Right
            }
        }
    }
}

impl Serialize for TextAnchor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TextAnchor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_name(&String::deserialize(deserializer)?))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ResolutionPreset {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const PRESET_RESOLUTIONS: [ResolutionPreset; 7] = [
    ResolutionPreset {
        label: "HD (1280×720)",
        width: 1280,
        height: 720,
    },
    ResolutionPreset {
        label: "Full HD (1920×1080)",
        width: 1920,
        height: 1080,
    },
    ResolutionPreset {
        label: "4K (3840×2160)",
        width: 3840,
        height: 2160,
    },
    ResolutionPreset {
        label: "Square (1080×1080)",
        width: 1080,
        height: 1080,
    },
    ResolutionPreset {
        label: "Portrait (1080×1350)",
        width: 1080,
        height: 1350,
    },
    ResolutionPreset {
        label: "Story (1080×1920)",
        width: 1080,
        height: 1920,
    },
    ResolutionPreset {
        label: "Custom",
        width: 800,
        height: 600,
    },
];

#[derive(Clone, Copy, Debug)]
pub struct AspectRatioChoice {
    pub label: &'static str,
    /// `None` marks the "Custom" entry, which recomputes nothing.
    pub ratio: Option<f64>,
}

pub const ASPECT_RATIOS: [AspectRatioChoice; 6] = [
    AspectRatioChoice {
        label: "16:9",
        ratio: Some(16.0 / 9.0),
    },
    AspectRatioChoice {
        label: "4:3",
        ratio: Some(4.0 / 3.0),
    },
    AspectRatioChoice {
        label: "1:1",
        ratio: Some(1.0),
    },
    AspectRatioChoice {
        label: "3:4",
        ratio: Some(3.0 / 4.0),
    },
    AspectRatioChoice {
        label: "9:16",
        ratio: Some(9.0 / 16.0),
    },
    AspectRatioChoice {
        label: "Custom",
        ratio: None,
    },
];

#[derive(Clone, Copy, Debug)]
pub struct GradientPresetDef {
    pub name: &'static str,
    pub colors: &'static [(u8, u8, u8)],
}

/// Named gradient color sequences; the first entry is the documented
/// fallback for unrecognized preset names.
pub const GRADIENT_PRESETS: [GradientPresetDef; 5] = [
    GradientPresetDef {
        name: "dusk",
        colors: &[(0xff, 0x7e, 0x5f), (0xfe, 0xb4, 0x7b)],
    },
    GradientPresetDef {
        name: "ocean",
        colors: &[(0x21, 0x93, 0xb0), (0x6d, 0xd5, 0xed)],
    },
    GradientPresetDef {
        name: "meadow",
        colors: &[(0x13, 0x4e, 0x5e), (0x71, 0xb2, 0x80)],
    },
    GradientPresetDef {
        name: "berry",
        colors: &[(0x8e, 0x2d, 0xe2), (0x4a, 0x00, 0xe0)],
    },
    GradientPresetDef {
        name: "aurora",
        colors: &[(0x00, 0xc9, 0xff), (0x92, 0xfe, 0x9d), (0xf9, 0xf8, 0x71)],
    },
];

/// Resolve a gradient preset name to its color sequence, falling back to the
/// first preset for unrecognized names.
pub fn gradient_colors(name: &str) -> Vec<ColorSpec> {
    let name = name.trim();
    let preset = GRADIENT_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .unwrap_or(&GRADIENT_PRESETS[0]);
    preset
        .colors
        .iter()
        .map(|&(r, g, b)| ColorSpec::from_rgb8(r, g, b))
        .collect()
}

/// The canonical, fully-resolved description of one image to paint.
///
/// Constructed fresh by the resolver on every edit and passed by value into
/// the compositor; the compositor never mutates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSpec {
    pub width: u32,
    pub height: u32,
    pub style: Style,
    pub primary_color: ColorSpec,
    pub secondary_color: ColorSpec,
    /// Ordered 2-3 color gradient ramp; only read by `Style::Gradient`.
    pub gradient: Vec<ColorSpec>,
    /// Overlay text; empty after trimming means no overlay is drawn.
    /// Explicit `\n` markers split lines.
    pub overlay_text: String,
    pub text_position: TextAnchor,
    pub text_color: ColorSpec,
    pub font_family: String,
    pub font_size_pt: f32,
    pub show_dimension_label: bool,
    /// Determinism seed for the geometric style's shape placement.
    pub seed: u64,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            style: Style::Solid,
            primary_color: ColorSpec::from_rgb8(0xf0, 0xf0, 0xf0),
            secondary_color: ColorSpec::from_rgb8(0xcc, 0xcc, 0xcc),
            gradient: gradient_colors(GRADIENT_PRESETS[0].name),
            overlay_text: "Sample Text".to_string(),
            text_position: TextAnchor::Center,
            text_color: ColorSpec::from_rgb8(0x33, 0x33, 0x33),
            font_family: "sans-serif".to_string(),
            font_size_pt: 48.0,
            show_dimension_label: true,
            seed: 0,
        }
    }
}

impl RenderSpec {
    pub fn validate(&self) -> PlacardResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlacardError::validation("width/height must be > 0"));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(PlacardError::validation(format!(
                "width/height must be <= {MAX_DIMENSION}"
            )));
        }
        if !self.font_size_pt.is_finite()
            || self.font_size_pt < FONT_SIZE_MIN_PT
            || self.font_size_pt > FONT_SIZE_MAX_PT
        {
            return Err(PlacardError::validation(format!(
                "font_size_pt must be within {FONT_SIZE_MIN_PT}..={FONT_SIZE_MAX_PT}"
            )));
        }
        if self.gradient.len() < 2 || self.gradient.len() > 3 {
            return Err(PlacardError::validation(
                "gradient must contain 2 or 3 colors",
            ));
        }
        Ok(())
    }

    /// Display label recomputed from the stored dimensions, never cached.
    pub fn aspect_ratio_label(&self) -> String {
        crate::spec::resolve::classify_aspect_ratio(self.width, self.height)
    }

    /// The dimension-label overlay line, always in unscaled pixels.
    pub fn dimension_label(&self) -> String {
        format!("{} × {}px", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let spec = RenderSpec {
            width: 1920,
            height: 1080,
            style: Style::Waves,
            overlay_text: "hello\nworld".to_string(),
            text_position: TextAnchor::BottomRight,
            ..RenderSpec::default()
        };
        let s = serde_json::to_string_pretty(&spec).unwrap();
        let de: RenderSpec = serde_json::from_str(&s).unwrap();
        assert_eq!(de.width, 1920);
        assert_eq!(de.style, Style::Waves);
        assert_eq!(de.text_position, TextAnchor::BottomRight);
        assert_eq!(de.overlay_text, "hello\nworld");
    }

    #[test]
    fn default_spec_validates() {
        assert!(RenderSpec::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let de: RenderSpec = serde_json::from_str(r#"{"width": 640, "style": "dots"}"#).unwrap();
        assert_eq!(de.width, 640);
        assert_eq!(de.height, 600);
        assert_eq!(de.style, Style::Dots);
    }

    #[test]
    fn unknown_style_and_anchor_fall_back_to_first_entry() {
        assert_eq!(Style::from_name("plasma"), Style::Solid);
        assert_eq!(TextAnchor::from_name("middle-ish"), TextAnchor::TopLeft);

        let de: RenderSpec =
            serde_json::from_str(r#"{"style": "plasma", "text_position": "nowhere"}"#).unwrap();
        assert_eq!(de.style, Style::Solid);
        assert_eq!(de.text_position, TextAnchor::TopLeft);
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let mut spec = RenderSpec {
            width: 0,
            ..RenderSpec::default()
        };
        assert!(spec.validate().is_err());

        spec.width = MAX_DIMENSION + 1;
        assert!(spec.validate().is_err());

        spec.width = 800;
        spec.font_size_pt = 8.0;
        assert!(spec.validate().is_err());

        spec.font_size_pt = 48.0;
        spec.gradient = vec![ColorSpec::from_rgb8(0, 0, 0)];
        assert!(spec.validate().is_err());
    }

    #[test]
    fn gradient_preset_lookup_falls_back_to_first() {
        assert_eq!(gradient_colors("aurora").len(), 3);
        assert_eq!(gradient_colors("no-such-preset"), gradient_colors("dusk"));
    }

    #[test]
    fn dimension_label_uses_unscaled_pixels() {
        let spec = RenderSpec::default();
        assert_eq!(spec.dimension_label(), "800 × 600px");
    }
}
