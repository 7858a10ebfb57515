//! CPU raster implementation of [`PaintSurface`] on a `vello_cpu` pixmap.
//!
//! Scene ops batch into a pending `RenderContext` and are composited onto
//! the persistent pixmap lazily; drop shadows force a flush because they
//! blur outside the scene (glyphs -> offscreen pixmap -> gaussian blur ->
//! premultiplied over). Gradient paints are computed pixel ramps wrapped as
//! image paints.

use std::sync::Arc;

use kurbo::{Affine, BezPath, Circle, PathEl, Point, Rect, Shape, Stroke, StrokeOpts};

use crate::foundation::error::PlacardResult;
use crate::render::blur::blur_rgba8_premul;
use crate::render::composite::over_in_place;
use crate::render::surface::{
    FrameRGBA, LinearGradient, PaintSurface, RadialGradient, TextAlign, TextStyle, sample_stops,
};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine};
use crate::spec::color::ColorSpec;

pub struct PixmapSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    scene: Option<vello_cpu::RenderContext>,
    text: TextLayoutEngine,
}

impl Default for PixmapSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PixmapSurface {
    pub fn new() -> Self {
        Self {
            width: 1,
            height: 1,
            pixmap: vello_cpu::Pixmap::new(1, 1),
            scene: None,
            text: TextLayoutEngine::new(),
        }
    }

    /// Register a font for text drawing; returns the reported family name.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> PlacardResult<String> {
        self.text.register(font_bytes)
    }

    pub fn has_fonts(&self) -> bool {
        self.text.has_fonts()
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Composite all pending scene ops onto the persistent pixmap.
    fn flush_scene(&mut self) -> PlacardResult<()> {
        let Some(mut ctx) = self.scene.take() else {
            return Ok(());
        };
        ctx.flush();
        let mut tmp = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut tmp);
        over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            tmp.data_as_u8_slice(),
            1.0,
        )
    }

    fn scene(&mut self) -> &mut vello_cpu::RenderContext {
        let (w, h) = (self.width, self.height);
        self.scene
            .get_or_insert_with(|| vello_cpu::RenderContext::new(w, h))
    }

    /// Pending ops flushed, pixels out (premultiplied RGBA8).
    pub fn to_frame(&mut self) -> PlacardResult<FrameRGBA> {
        self.flush_scene()?;
        Ok(FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn fill_cpu_path(&mut self, path: &BezPath, color: ColorSpec) {
        let cpu_path = bezpath_to_cpu(path);
        let ctx = self.scene();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_path(&cpu_path);
    }

    fn fill_gradient_image(
        &mut self,
        rect: Rect,
        pixels: Vec<vello_cpu::peniko::color::PremulRgba8>,
        w: u16,
        h: u16,
    ) {
        let mut may_have_opacities = false;
        for px in &pixels {
            may_have_opacities |= px.a != 255;
        }
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let ctx = self.scene();
        ctx.set_transform(affine_to_cpu(Affine::translate((rect.x0, rect.y0))));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
    }

    fn draw_glyphs(
        ctx: &mut vello_cpu::RenderContext,
        layout: &parley::Layout<TextBrushRgba8>,
        font: &vello_cpu::peniko::FontData,
        origin: Point,
        color: ColorSpec,
    ) {
        ctx.set_transform(affine_to_cpu(Affine::translate((origin.x, origin.y))));
        ctx.set_paint(color_to_cpu(color));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

impl PaintSurface for PixmapSurface {
    fn resize(&mut self, width: u32, height: u32) -> bool {
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return false;
        };
        if w == 0 || h == 0 {
            return false;
        }
        self.width = w;
        self.height = h;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.scene = None;
        true
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorSpec) {
        let ctx = self.scene();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: ColorSpec) {
        let path = Circle::new(center, radius.max(0.0)).to_path(0.1);
        self.fill_cpu_path(&path, color);
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: ColorSpec) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(points[0]);
        for &p in &points[1..] {
            path.line_to(p);
        }
        let expanded = kurbo::stroke(path, &Stroke::new(width), &StrokeOpts::default(), 0.25);
        self.fill_cpu_path(&expanded, color);
    }

    fn fill_linear_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        let (w, h) = match raster_dims(rect) {
            Some(dims) => dims,
            None => return,
        };

        let d = gradient.end - gradient.start;
        let denom = d.dot(d);
        let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
        for py in 0..h {
            for px in 0..w {
                let p = Point::new(
                    rect.x0 + f64::from(px) + 0.5,
                    rect.y0 + f64::from(py) + 0.5,
                );
                let t = if denom <= 0.0 {
                    0.0
                } else {
                    (p - gradient.start).dot(d) / denom
                };
                pixels.push(premul_px(sample_stops(&gradient.stops, t)));
            }
        }
        self.fill_gradient_image(rect, pixels, w, h);
    }

    fn fill_radial_gradient(&mut self, rect: Rect, gradient: &RadialGradient) {
        let (w, h) = match raster_dims(rect) {
            Some(dims) => dims,
            None => return,
        };

        let radius = gradient.radius.max(1e-6);
        let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
        for py in 0..h {
            for px in 0..w {
                let p = Point::new(
                    rect.x0 + f64::from(px) + 0.5,
                    rect.y0 + f64::from(py) + 0.5,
                );
                let t = p.distance(gradient.center) / radius;
                pixels.push(premul_px(sample_stops(&gradient.stops, t)));
            }
        }
        self.fill_gradient_image(rect, pixels, w, h);
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        style: &TextStyle<'_>,
    ) -> PlacardResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        let brush = {
            let [r, g, b, a] = style.color.to_rgba8();
            TextBrushRgba8 { r, g, b, a }
        };
        let line = self
            .text
            .layout_line(text, style.family, style.size_px as f32, brush)?;

        let x = match style.align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - line.width / 2.0,
            TextAlign::Right => origin.x - line.width,
        };
        let top = Point::new(x, origin.y - line.baseline);

        if let Some(shadow) = style.shadow {
            self.flush_scene()?;

            let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
            Self::draw_glyphs(
                &mut ctx,
                &line.layout,
                &line.font,
                top + shadow.offset,
                shadow.color,
            );
            ctx.flush();
            let mut tmp = vello_cpu::Pixmap::new(self.width, self.height);
            ctx.render_to_pixmap(&mut tmp);

            let radius = shadow.blur.max(0.0).round() as u32;
            if radius > 0 {
                let sigma = ((shadow.blur / 2.0) as f32).max(0.5);
                let blurred = blur_rgba8_premul(
                    tmp.data_as_u8_slice(),
                    self.width(),
                    self.height(),
                    radius,
                    sigma,
                )?;
                over_in_place(self.pixmap.data_as_u8_slice_mut(), &blurred, 1.0)?;
            } else {
                over_in_place(
                    self.pixmap.data_as_u8_slice_mut(),
                    tmp.data_as_u8_slice(),
                    1.0,
                )?;
            }
        }

        let ctx = self.scene();
        // The shadow pass (if any) is already on the pixmap; the face renders
        // over it with the batch.
        Self::draw_glyphs(ctx, &line.layout, &line.font, top, style.color);
        Ok(())
    }
}

fn raster_dims(rect: Rect) -> Option<(u16, u16)> {
    let w = rect.width().ceil();
    let h = rect.height().ceil();
    if w < 1.0 || h < 1.0 {
        return None;
    }
    let w = u16::try_from(w as u64).ok()?;
    let h = u16::try_from(h as u64).ok()?;
    Some((w, h))
}

fn premul_px(color: ColorSpec) -> vello_cpu::peniko::color::PremulRgba8 {
    let [r, g, b, a] = color.to_premul_rgba8();
    vello_cpu::peniko::color::PremulRgba8 { r, g, b, a }
}

fn color_to_cpu(color: ColorSpec) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = color.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::GradientStop;

    fn frame(surface: &mut PixmapSurface) -> FrameRGBA {
        surface.to_frame().unwrap()
    }

    #[test]
    fn resize_rejects_oversized_dimensions() {
        let mut s = PixmapSurface::new();
        assert!(s.resize(64, 48));
        assert_eq!((s.width(), s.height()), (64, 48));
        assert!(!s.resize(100_000, 10));
        assert!(!s.resize(0, 10));
    }

    #[test]
    fn fill_rect_covers_every_pixel() {
        let mut s = PixmapSurface::new();
        assert!(s.resize(8, 8));
        s.fill_rect(
            Rect::new(0.0, 0.0, 8.0, 8.0),
            ColorSpec::from_rgb8(255, 0, 0),
        );
        let f = frame(&mut s);
        for px in f.data.chunks_exact(4) {
            assert_eq!(px, &[255, 0, 0, 255]);
        }
    }

    #[test]
    fn linear_gradient_ramps_between_endpoint_colors() {
        let mut s = PixmapSurface::new();
        assert!(s.resize(16, 1));
        let g = LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(16.0, 0.0),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: ColorSpec::from_rgb8(0, 0, 0),
                },
                GradientStop {
                    offset: 1.0,
                    color: ColorSpec::from_rgb8(255, 255, 255),
                },
            ],
        };
        s.fill_linear_gradient(Rect::new(0.0, 0.0, 16.0, 1.0), &g);
        let f = frame(&mut s);
        let first = f.data[0];
        let last = f.data[(15 * 4) as usize];
        assert!(first < 32);
        assert!(last > 223);
    }

    #[test]
    fn circle_fill_stays_inside_bounds() {
        let mut s = PixmapSurface::new();
        assert!(s.resize(16, 16));
        s.fill_circle(
            Point::new(8.0, 8.0),
            4.0,
            ColorSpec::from_rgb8(0, 255, 0),
        );
        let f = frame(&mut s);
        let idx = |x: usize, y: usize| (y * 16 + x) * 4;
        // Center painted, far corner untouched.
        assert!(f.data[idx(8, 8) + 3] > 0);
        assert_eq!(f.data[idx(0, 0) + 3], 0);
    }
}
