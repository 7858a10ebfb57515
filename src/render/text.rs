//! Parley-backed text shaping for single overlay lines.
//!
//! Fonts are registered from raw bytes; there is no system-font discovery.
//! Family requests resolve case-insensitively against registered families,
//! falling back to the first registration.

use std::borrow::Cow;

use crate::foundation::error::{PlacardError, PlacardResult};

/// RGBA8 brush color carried through Parley layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// One shaped line plus the metrics the caller needs for anchoring.
pub(crate) struct LineLayout {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
    /// Advance width of the line in pixels.
    pub(crate) width: f64,
    /// Baseline offset from the layout top in pixels.
    pub(crate) baseline: f64,
}

struct RegisteredFamily {
    name: String,
    font: vello_cpu::peniko::FontData,
}

pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: Vec<RegisteredFamily>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: Vec::new(),
        }
    }

    pub(crate) fn has_fonts(&self) -> bool {
        !self.families.is_empty()
    }

    /// Register a font from raw bytes; returns the family name parley
    /// reports for it.
    pub(crate) fn register(&mut self, font_bytes: Vec<u8>) -> PlacardResult<String> {
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PlacardError::validation("no font families registered from font bytes"))?;

        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PlacardError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        self.families.push(RegisteredFamily {
            name: name.clone(),
            font,
        });
        Ok(name)
    }

    fn resolve_family(&self, requested: &str) -> PlacardResult<(String, vello_cpu::peniko::FontData)> {
        let fam = self
            .families
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(requested.trim()))
            .or(self.families.first())
            .ok_or_else(|| {
                PlacardError::render("text drawing requires at least one registered font")
            })?;
        Ok((fam.name.clone(), fam.font.clone()))
    }

    /// Shape and lay out one line of plain text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        requested_family: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PlacardResult<LineLayout> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PlacardError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let (family_name, font) = self.resolve_family(requested_family)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut width = 0.0f64;
        let mut baseline = 0.0f64;
        if let Some(line) = layout.lines().next() {
            let m = line.metrics();
            width = f64::from(m.advance);
            // Half-leading placement: the first baseline sits one half of
            // the leading below the layout top, then the ascent.
            baseline = f64::from(m.ascent) + f64::from(m.leading) * 0.5;
        }

        Ok(LineLayout {
            layout,
            font,
            width,
            baseline,
        })
    }
}
