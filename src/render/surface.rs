//! The minimal 2D paint capability the compositor draws against.
//!
//! The compositor hands fully scaled device-space coordinates to a
//! [`PaintSurface`]; implementations own rasterization, font resolution and
//! pixel storage. The product backend is [`crate::render::pixmap::PixmapSurface`];
//! tests substitute recording stubs.

use kurbo::{Point, Rect, Vec2};

use crate::foundation::error::PlacardResult;
use crate::spec::color::ColorSpec;

/// One rendered frame in row-major RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drop shadow behind a text draw; `blur` and `offset` are device pixels.
#[derive(Clone, Copy, Debug)]
pub struct TextShadow {
    pub color: ColorSpec,
    pub blur: f64,
    pub offset: Vec2,
}

/// Styling for one text draw call.
#[derive(Clone, Debug)]
pub struct TextStyle<'a> {
    pub family: &'a str,
    pub size_px: f64,
    pub color: ColorSpec,
    pub align: TextAlign,
    pub shadow: Option<TextShadow>,
}

#[derive(Clone, Copy, Debug)]
pub struct GradientStop {
    /// Position along the gradient axis in `0..=1`.
    pub offset: f64,
    pub color: ColorSpec,
}

#[derive(Clone, Debug)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// Gradient with the given colors spread evenly along the axis
    /// (2 colors -> stops at 0 and 1; 3 colors -> 0, 0.5, 1).
    pub fn evenly(start: Point, end: Point, colors: &[ColorSpec]) -> Self {
        Self {
            start,
            end,
            stops: even_stops(colors),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f64,
    pub stops: Vec<GradientStop>,
}

pub fn even_stops(colors: &[ColorSpec]) -> Vec<GradientStop> {
    let n = colors.len();
    colors
        .iter()
        .enumerate()
        .map(|(i, &color)| GradientStop {
            offset: if n <= 1 {
                0.0
            } else {
                i as f64 / (n - 1) as f64
            },
            color,
        })
        .collect()
}

/// Interpolated color at `t` along a stop sequence. Positions outside the
/// covered range clamp to the nearest stop.
pub(crate) fn sample_stops(stops: &[GradientStop], t: f64) -> ColorSpec {
    let Some(first) = stops.first() else {
        return ColorSpec::rgba(0.0, 0.0, 0.0, 0.0);
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.offset {
            let span = hi.offset - lo.offset;
            let local = if span <= 0.0 { 0.0 } else { (t - lo.offset) / span };
            return lo.color.lerp(hi.color, local);
        }
    }
    stops[stops.len() - 1].color
}

/// Abstract 2D raster target. Coordinates are device pixels after scaling;
/// colors carry straight alpha and composite source-over in call order.
pub trait PaintSurface {
    /// Size (or re-size) the backing store. Returning `false` marks the
    /// surface unavailable, which callers treat as "skip this frame".
    fn resize(&mut self, width: u32, height: u32) -> bool;

    fn fill_rect(&mut self, rect: Rect, color: ColorSpec);

    fn fill_circle(&mut self, center: Point, radius: f64, color: ColorSpec);

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: ColorSpec);

    fn fill_linear_gradient(&mut self, rect: Rect, gradient: &LinearGradient);

    fn fill_radial_gradient(&mut self, rect: Rect, gradient: &RadialGradient);

    /// Draw one line of text. `origin.x` is the anchor for the chosen
    /// alignment and `origin.y` the baseline.
    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle<'_>)
    -> PlacardResult<()>;
}
