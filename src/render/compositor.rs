//! The image composition engine.
//!
//! [`render`] maps one [`RenderSpec`] and a scale factor onto a
//! [`PaintSurface`] as a fixed pipeline: procedural background, ambient
//! vignette, optional dimension label, optional anchored text overlay.
//! Every linear metric multiplies by `scale`, so the same spec paints a
//! geometrically self-similar composition at preview and export size.

use kurbo::{Point, Rect, Vec2};

use crate::foundation::error::PlacardResult;
use crate::foundation::math::SplitMix64;
use crate::render::surface::{
    LinearGradient, PaintSurface, RadialGradient, TextAlign, TextShadow, TextStyle, even_stops,
};
use crate::spec::color::ColorSpec;
use crate::spec::model::{AnchorColumn, AnchorRow, RenderSpec, Style, TextAnchor};

// Fixed metrics in unscaled pixels.
const TEXT_PADDING: f64 = 60.0;
const LABEL_BAND: f64 = 40.0;

const GRID_SPACING: f64 = 60.0;
const GRID_LINE_WIDTH: f64 = 1.0;
const GRID_ALPHA: f64 = 0.15;

const DOT_SPACING: f64 = 30.0;
const DOT_RADIUS: f64 = 4.0;
const DOT_ALPHA: f64 = 0.3;

const WAVE_COUNT: u32 = 5;
const WAVE_AMPLITUDE: f64 = 30.0;
const WAVE_SAMPLE_STEP: f64 = 10.0;
const WAVE_LINE_WIDTH: f64 = 2.0;
const WAVE_ALPHA: f64 = 0.2;
// Radians per unscaled pixel; period ~314 px.
const WAVE_FREQUENCY: f64 = 0.02;

const SHAPE_COUNT: u32 = 15;
const SHAPE_ALPHA: f64 = 0.1;
const SHAPE_SIZE_MIN: f64 = 20.0;
const SHAPE_SIZE_MAX: f64 = 100.0;

const VIGNETTE_RADIUS_DIVISOR: f64 = 1.5;
const VIGNETTE_INNER_ALPHA: f64 = 0.05;
const VIGNETTE_OUTER_ALPHA: f64 = 0.1;

const LABEL_FONT_SIZE: f64 = 16.0;
const LABEL_FONT_FLOOR: f64 = 12.0;
const LABEL_ALPHA: f64 = 0.6;
const LABEL_BASELINE: f64 = 30.0;

const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Paint `spec` onto `surface` at `scale`.
///
/// The surface is resized to `round(width*scale) x round(height*scale)`
/// first; a refused resize (surface unavailable) skips the frame silently.
/// The compositor trusts the resolver's invariants and does not re-validate.
#[tracing::instrument(skip(spec, surface))]
pub fn render(spec: &RenderSpec, surface: &mut dyn PaintSurface, scale: f64) -> PlacardResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Ok(());
    }

    let w = (f64::from(spec.width) * scale).round().max(1.0);
    let h = (f64::from(spec.height) * scale).round().max(1.0);
    if !surface.resize(w as u32, h as u32) {
        return Ok(());
    }

    paint_background(spec, surface, w, h, scale);
    paint_vignette(surface, w, h);
    if spec.show_dimension_label {
        paint_dimension_label(spec, surface, w, scale)?;
    }
    paint_overlay(spec, surface, w, h, scale)?;
    Ok(())
}

fn paint_background(spec: &RenderSpec, surface: &mut dyn PaintSurface, w: f64, h: f64, scale: f64) {
    let full = Rect::new(0.0, 0.0, w, h);
    match spec.style {
        Style::Solid => surface.fill_rect(full, spec.primary_color),
        Style::Gradient => {
            let gradient = LinearGradient::evenly(
                Point::new(0.0, 0.0),
                Point::new(w, h),
                &spec.gradient,
            );
            surface.fill_linear_gradient(full, &gradient);
        }
        Style::Geometric => {
            surface.fill_rect(full, spec.primary_color);
            let color = spec.secondary_color.with_alpha(SHAPE_ALPHA);
            let mut rng = SplitMix64::new(spec.seed);
            for i in 0..SHAPE_COUNT {
                let x = rng.in_range(0.0, w);
                let y = rng.in_range(0.0, h);
                let size = rng.in_range(SHAPE_SIZE_MIN, SHAPE_SIZE_MAX) * scale;
                if i % 2 == 0 {
                    surface.fill_circle(Point::new(x, y), size, color);
                } else {
                    surface.fill_rect(Rect::new(x, y, x + size, y + size), color);
                }
            }
        }
        Style::Dots => {
            surface.fill_rect(full, spec.primary_color);
            let color = spec.secondary_color.with_alpha(DOT_ALPHA);
            let spacing = DOT_SPACING * scale;
            let radius = DOT_RADIUS * scale;
            let mut y = spacing;
            while y < h {
                let mut x = spacing;
                while x < w {
                    surface.fill_circle(Point::new(x, y), radius, color);
                    x += spacing;
                }
                y += spacing;
            }
        }
        Style::Waves => {
            let gradient = LinearGradient::evenly(
                Point::new(0.0, 0.0),
                Point::new(0.0, h),
                &[spec.primary_color, spec.secondary_color],
            );
            surface.fill_linear_gradient(full, &gradient);

            let color = ColorSpec::from_rgb8(255, 255, 255).with_alpha(WAVE_ALPHA);
            let step = WAVE_SAMPLE_STEP * scale;
            let amplitude = WAVE_AMPLITUDE * scale;
            let band = h / f64::from(WAVE_COUNT + 1);
            for i in 0..WAVE_COUNT {
                let base_y = band * f64::from(i + 1);
                let phase = f64::from(i);
                let mut points = Vec::new();
                let mut x = 0.0;
                while x <= w + step {
                    let y = base_y + ((x / scale) * WAVE_FREQUENCY + phase).sin() * amplitude;
                    points.push(Point::new(x, y));
                    x += step;
                }
                surface.stroke_polyline(&points, WAVE_LINE_WIDTH * scale, color);
            }
        }
        Style::Grid => {
            surface.fill_rect(full, spec.primary_color);
            let color = spec.secondary_color.with_alpha(GRID_ALPHA);
            let spacing = GRID_SPACING * scale;
            let width = GRID_LINE_WIDTH * scale;
            let mut x = 0.0;
            while x <= w {
                surface.stroke_polyline(&[Point::new(x, 0.0), Point::new(x, h)], width, color);
                x += spacing;
            }
            let mut y = 0.0;
            while y <= h {
                surface.stroke_polyline(&[Point::new(0.0, y), Point::new(w, y)], width, color);
                y += spacing;
            }
        }
    }
}

/// Ambient vignette, painted over every style.
fn paint_vignette(surface: &mut dyn PaintSurface, w: f64, h: f64) {
    let gradient = RadialGradient {
        center: Point::new(w / 2.0, h / 2.0),
        radius: w.max(h) / VIGNETTE_RADIUS_DIVISOR,
        stops: even_stops(&[
            ColorSpec::from_rgb8(255, 255, 255).with_alpha(VIGNETTE_INNER_ALPHA),
            ColorSpec::from_rgb8(0, 0, 0).with_alpha(VIGNETTE_OUTER_ALPHA),
        ]),
    };
    surface.fill_radial_gradient(Rect::new(0.0, 0.0, w, h), &gradient);
}

fn paint_dimension_label(
    spec: &RenderSpec,
    surface: &mut dyn PaintSurface,
    w: f64,
    scale: f64,
) -> PlacardResult<()> {
    let size = (LABEL_FONT_SIZE * scale).max(LABEL_FONT_FLOOR);
    let baseline = (LABEL_BASELINE * scale).max(LABEL_FONT_FLOOR + 2.0);
    let style = TextStyle {
        family: &spec.font_family,
        size_px: size,
        color: spec.text_color.with_alpha(LABEL_ALPHA),
        align: TextAlign::Center,
        shadow: Some(TextShadow {
            color: ColorSpec::from_rgb8(0, 0, 0).with_alpha(0.35),
            blur: 4.0 * scale,
            offset: Vec2::new(0.0, 1.0 * scale),
        }),
    };
    surface.draw_text(&spec.dimension_label(), Point::new(w / 2.0, baseline), &style)
}

fn paint_overlay(
    spec: &RenderSpec,
    surface: &mut dyn PaintSurface,
    w: f64,
    h: f64,
    scale: f64,
) -> PlacardResult<()> {
    let trimmed = spec.overlay_text.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let lines: Vec<&str> = trimmed.split('\n').collect();

    let font_px = f64::from(spec.font_size_pt) * scale;
    let line_height = font_px * LINE_HEIGHT_FACTOR;
    let anchor = anchor_point(
        spec.text_position,
        w,
        h,
        scale,
        spec.show_dimension_label,
    );
    let first = first_baseline(anchor.y, lines.len(), line_height);

    let align = match spec.text_position.column() {
        AnchorColumn::Left => TextAlign::Left,
        AnchorColumn::Center => TextAlign::Center,
        AnchorColumn::Right => TextAlign::Right,
    };
    let style = TextStyle {
        family: &spec.font_family,
        size_px: font_px,
        color: spec.text_color,
        align,
        shadow: Some(TextShadow {
            color: ColorSpec::from_rgb8(0, 0, 0).with_alpha(0.5),
            blur: 8.0 * scale,
            offset: Vec2::new(2.0 * scale, 2.0 * scale),
        }),
    };

    for (i, line) in lines.iter().enumerate() {
        let baseline = first + i as f64 * line_height;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        surface.draw_text(line, Point::new(anchor.x, baseline), &style)?;
    }
    Ok(())
}

/// Device-space anchor position for a text block. Top-row anchors shift down
/// one label band when the dimension label occupies the top edge.
pub fn anchor_point(
    anchor: TextAnchor,
    w: f64,
    h: f64,
    scale: f64,
    label_shown: bool,
) -> Point {
    let padding = TEXT_PADDING * scale;
    let x = match anchor.column() {
        AnchorColumn::Left => padding,
        AnchorColumn::Center => w / 2.0,
        AnchorColumn::Right => w - padding,
    };
    let y = match anchor.row() {
        AnchorRow::Top => {
            let offset = if label_shown { LABEL_BAND * scale } else { 0.0 };
            padding + offset
        }
        AnchorRow::Middle => h / 2.0,
        AnchorRow::Bottom => h - padding,
    };
    Point::new(x, y)
}

/// Baseline of the first line when a block of `line_count` lines is
/// vertically centered around `anchor_y`.
pub fn first_baseline(anchor_y: f64, line_count: usize, line_height: f64) -> f64 {
    let total = line_count as f64 * line_height;
    anchor_y - total / 2.0 + line_height / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_table_matches_padding_rules() {
        let (w, h) = (800.0, 600.0);
        let p = anchor_point(TextAnchor::TopLeft, w, h, 1.0, false);
        assert_eq!((p.x, p.y), (60.0, 60.0));

        let p = anchor_point(TextAnchor::Center, w, h, 1.0, false);
        assert_eq!((p.x, p.y), (400.0, 300.0));

        let p = anchor_point(TextAnchor::BottomRight, w, h, 1.0, false);
        assert_eq!((p.x, p.y), (740.0, 540.0));
    }

    #[test]
    fn label_band_only_shifts_top_row() {
        let (w, h) = (800.0, 600.0);
        let top = anchor_point(TextAnchor::TopCenter, w, h, 1.0, true);
        assert_eq!(top.y, 100.0);

        let mid = anchor_point(TextAnchor::Center, w, h, 1.0, true);
        assert_eq!(mid.y, 300.0);

        let bottom = anchor_point(TextAnchor::BottomCenter, w, h, 1.0, true);
        assert_eq!(bottom.y, 540.0);
    }

    #[test]
    fn anchor_padding_scales() {
        let p1 = anchor_point(TextAnchor::TopLeft, 800.0, 600.0, 1.0, false);
        let p2 = anchor_point(TextAnchor::TopLeft, 400.0, 300.0, 0.5, false);
        assert_eq!(p2.x, p1.x / 2.0);
        assert_eq!(p2.y, p1.y / 2.0);
    }

    #[test]
    fn odd_line_block_centers_middle_baseline_on_anchor() {
        let anchor_y = 300.0;
        let line_height = 48.0 * 1.2;
        let first = first_baseline(anchor_y, 3, line_height);
        let middle = first + line_height;
        assert!((middle - anchor_y).abs() < 1e-9);
    }

    #[test]
    fn single_line_baseline_sits_on_anchor() {
        assert!((first_baseline(250.0, 1, 57.6) - 250.0).abs() < 1e-9);
    }
}
