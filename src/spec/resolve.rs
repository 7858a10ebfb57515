//! Pure specification resolver.
//!
//! Normalizes user-facing edits (raw dimension strings, preset labels, style
//! names, field values) into a canonical [`RenderSpec`] plus the two
//! selection labels the form layer displays. Total for well-typed input:
//! malformed numbers coerce to safe defaults and unknown names fall back to
//! the first entry of their set, never an error.

use crate::spec::color::ColorSpec;
use crate::spec::model::{
    ASPECT_RATIOS, MAX_DIMENSION, PRESET_RESOLUTIONS, RenderSpec, Style, TextAnchor,
    gradient_colors,
};

pub const CUSTOM_LABEL: &str = "Custom";

/// Resolver state: the spec itself plus the preset/aspect selection labels.
///
/// The labels are pure UI echoes; the numeric truth always lives in
/// `spec.width`/`spec.height`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolverState {
    pub spec: RenderSpec,
    pub resolution_label: String,
    pub aspect_label: String,
}

impl Default for ResolverState {
    fn default() -> Self {
        Self {
            spec: RenderSpec::default(),
            resolution_label: CUSTOM_LABEL.to_string(),
            aspect_label: CUSTOM_LABEL.to_string(),
        }
    }
}

/// One user-facing edit. Dimension edits carry the raw input string so the
/// resolver owns the coercion rules.
#[derive(Clone, Debug)]
pub enum SpecEdit {
    Width(String),
    Height(String),
    Resolution(String),
    AspectRatio(String),
    Style(String),
    PrimaryColor(ColorSpec),
    SecondaryColor(ColorSpec),
    GradientPreset(String),
    OverlayText(String),
    TextPosition(String),
    TextColor(ColorSpec),
    FontFamily(String),
    FontSizePt(f32),
    ShowDimensionLabel(bool),
    Seed(u64),
}

/// Apply one edit, producing the next state. Pure; `current` is untouched.
#[tracing::instrument(skip(current))]
pub fn resolve(current: &ResolverState, edit: &SpecEdit) -> ResolverState {
    let mut next = current.clone();
    match edit {
        SpecEdit::Width(raw) => {
            next.spec.width = parse_dimension(raw);
            decouple_labels(&mut next);
        }
        SpecEdit::Height(raw) => {
            next.spec.height = parse_dimension(raw);
            decouple_labels(&mut next);
        }
        SpecEdit::Resolution(label) => {
            next.resolution_label = label.clone();
            if let Some(preset) = PRESET_RESOLUTIONS.iter().find(|p| p.label == label.as_str()) {
                next.spec.width = preset.width;
                next.spec.height = preset.height;
                let ratio_label = classify_aspect_ratio(preset.width, preset.height);
                next.aspect_label = ASPECT_RATIOS
                    .iter()
                    .find(|r| r.label == ratio_label)
                    .map(|r| r.label.to_string())
                    .unwrap_or_else(|| CUSTOM_LABEL.to_string());
            }
        }
        SpecEdit::AspectRatio(label) => {
            next.aspect_label = label.clone();
            next.resolution_label = CUSTOM_LABEL.to_string();
            let choice = ASPECT_RATIOS.iter().find(|r| r.label == label.as_str());
            if let Some(ratio) = choice.and_then(|c| c.ratio) {
                let height = (f64::from(next.spec.width) / ratio).round();
                next.spec.height = (height.max(1.0) as u32).min(MAX_DIMENSION);
            }
        }
        SpecEdit::Style(name) => next.spec.style = Style::from_name(name),
        SpecEdit::PrimaryColor(c) => next.spec.primary_color = *c,
        SpecEdit::SecondaryColor(c) => next.spec.secondary_color = *c,
        SpecEdit::GradientPreset(name) => next.spec.gradient = gradient_colors(name),
        SpecEdit::OverlayText(text) => next.spec.overlay_text = text.clone(),
        SpecEdit::TextPosition(name) => next.spec.text_position = TextAnchor::from_name(name),
        SpecEdit::TextColor(c) => next.spec.text_color = *c,
        SpecEdit::FontFamily(family) => next.spec.font_family = family.clone(),
        SpecEdit::FontSizePt(pt) => next.spec.font_size_pt = coerce_font_size(*pt),
        SpecEdit::ShowDimensionLabel(show) => next.spec.show_dimension_label = *show,
        SpecEdit::Seed(seed) => next.spec.seed = *seed,
    }
    next
}

/// Manual dimension entry is authoritative: it detaches both preset labels.
fn decouple_labels(state: &mut ResolverState) {
    state.resolution_label = CUSTOM_LABEL.to_string();
    state.aspect_label = CUSTOM_LABEL.to_string();
}

/// Parse a raw dimension string. Non-parseable or non-positive input
/// resolves to 1; values above the bound clamp to it.
pub fn parse_dimension(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(v) if v > 0 => (v.min(i64::from(MAX_DIMENSION))) as u32,
        _ => 1,
    }
}

fn coerce_font_size(pt: f32) -> f32 {
    use crate::spec::model::{FONT_SIZE_MAX_PT, FONT_SIZE_MIN_PT};
    if !pt.is_finite() {
        return RenderSpec::default().font_size_pt;
    }
    pt.clamp(FONT_SIZE_MIN_PT, FONT_SIZE_MAX_PT)
}

/// Classify a dimension pair as one of the five canonical ratio labels
/// (within an absolute tolerance of 0.01) or as the gcd-reduced `"W:H"`.
pub fn classify_aspect_ratio(width: u32, height: u32) -> String {
    const TOLERANCE: f64 = 0.01;

    if height > 0 {
        let current = f64::from(width) / f64::from(height);
        let canonical = ASPECT_RATIOS
            .iter()
            .filter_map(|c| c.ratio.map(|r| (c.label, r)))
            .find(|&(_, r)| (r - current).abs() < TOLERANCE);
        if let Some((label, _)) = canonical {
            return label.to_string();
        }
    }

    let divisor = gcd(u64::from(width), u64::from(height)).max(1);
    format!(
        "{}:{}",
        u64::from(width) / divisor,
        u64::from(height) / divisor
    )
}

/// `gcd(a, 0) = a`, standard recursive remainder form.
pub fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Scale factor that fits `width x height` inside a `max_edge` square
/// without upscaling. The interactive preview uses `max_edge = 400`.
pub fn preview_scale(width: u32, height: u32, max_edge: f64) -> f64 {
    let w = f64::from(width.max(1));
    let h = f64::from(height.max(1));
    (max_edge / w).min(max_edge / h).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_handles_zero_and_common_cases() {
        assert_eq!(gcd(12, 0), 12);
        assert_eq!(gcd(0, 12), 12);
        assert_eq!(gcd(1920, 1080), 120);
        assert_eq!(gcd(17, 13), 1);
    }

    #[test]
    fn classify_matches_canonical_ratios() {
        assert_eq!(classify_aspect_ratio(1920, 1080), "16:9");
        assert_eq!(classify_aspect_ratio(800, 600), "4:3");
        assert_eq!(classify_aspect_ratio(1080, 1080), "1:1");
        assert_eq!(classify_aspect_ratio(1080, 1440), "3:4");
        assert_eq!(classify_aspect_ratio(1080, 1920), "9:16");
    }

    #[test]
    fn classify_reduces_non_canonical_ratios() {
        assert_eq!(classify_aspect_ratio(500, 300), "5:3");
        assert_eq!(classify_aspect_ratio(1080, 1350), "4:5");
        assert_eq!(classify_aspect_ratio(7, 5), "7:5");
    }

    #[test]
    fn classify_tolerance_is_absolute() {
        // 1366x768 is 1.7786.., within 0.01 of 16:9 (1.7777..).
        assert_eq!(classify_aspect_ratio(1366, 768), "16:9");
        // 3:2 is 1.5, well outside the tolerance of any canonical entry.
        assert_eq!(classify_aspect_ratio(3000, 2000), "3:2");
    }

    #[test]
    fn parse_dimension_coerces_bad_input() {
        assert_eq!(parse_dimension("800"), 800);
        assert_eq!(parse_dimension("  640 "), 640);
        assert_eq!(parse_dimension("abc"), 1);
        assert_eq!(parse_dimension(""), 1);
        assert_eq!(parse_dimension("-5"), 1);
        assert_eq!(parse_dimension("0"), 1);
        assert_eq!(parse_dimension("99999"), MAX_DIMENSION);
    }

    #[test]
    fn font_size_coercion() {
        let base = ResolverState::default();
        let next = resolve(&base, &SpecEdit::FontSizePt(4.0));
        assert_eq!(next.spec.font_size_pt, 16.0);
        let next = resolve(&base, &SpecEdit::FontSizePt(500.0));
        assert_eq!(next.spec.font_size_pt, 120.0);
        let next = resolve(&base, &SpecEdit::FontSizePt(f32::NAN));
        assert_eq!(next.spec.font_size_pt, 48.0);
    }

    #[test]
    fn aspect_edit_clamps_derived_height() {
        let state = ResolverState {
            spec: RenderSpec {
                width: MAX_DIMENSION,
                ..RenderSpec::default()
            },
            ..ResolverState::default()
        };
        let next = resolve(&state, &SpecEdit::AspectRatio("9:16".to_string()));
        assert_eq!(next.spec.height, MAX_DIMENSION);
    }

    #[test]
    fn preview_scale_fits_max_edge() {
        assert_eq!(preview_scale(800, 600, 400.0), 0.5);
        assert_eq!(preview_scale(200, 100, 400.0), 1.0);
        let s = preview_scale(1080, 1920, 400.0);
        assert!((s - 400.0 / 1920.0).abs() < 1e-12);
    }
}
