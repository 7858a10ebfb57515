//! Full-resolution export: render once at scale 1 and encode as PNG.

use std::io::Cursor;
use std::path::Path;

use crate::foundation::error::{PlacardError, PlacardResult};
use crate::render::compositor;
use crate::render::pixmap::PixmapSurface;
use crate::render::surface::FrameRGBA;
use crate::spec::model::RenderSpec;

/// Download file name for an export, `image_{width}_{height}.png`.
pub fn file_name(width: u32, height: u32) -> String {
    format!("image_{width}_{height}.png")
}

/// Render `spec` at native resolution. The resulting frame is exactly
/// `width x height` regardless of any earlier preview renders on `surface`.
pub fn render_full(spec: &RenderSpec, surface: &mut PixmapSurface) -> PlacardResult<FrameRGBA> {
    compositor::render(spec, surface, 1.0)?;
    surface.to_frame()
}

/// PNG-encode a rendered frame.
///
/// Frames are premultiplied RGBA8; compositions start from an opaque
/// background fill, so alpha is 255 throughout and the bytes encode
/// directly.
pub fn encode_png(frame: &FrameRGBA) -> PlacardResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| PlacardError::render(format!("png encode failed: {e}")))?;
    Ok(out.into_inner())
}

/// Render at scale 1 and write the PNG to `path`.
pub fn write_png(spec: &RenderSpec, surface: &mut PixmapSurface, path: &Path) -> PlacardResult<()> {
    let frame = render_full(spec, surface)?;
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| PlacardError::render(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_pattern() {
        assert_eq!(file_name(800, 600), "image_800_600.png");
        assert_eq!(file_name(1920, 1080), "image_1920_1080.png");
    }

    #[test]
    fn encode_png_emits_signature() {
        let spec = RenderSpec {
            width: 12,
            height: 9,
            overlay_text: String::new(),
            show_dimension_label: false,
            ..RenderSpec::default()
        };
        let mut surface = PixmapSurface::new();
        let frame = render_full(&spec, &mut surface).unwrap();
        assert_eq!((frame.width, frame.height), (12, 9));

        let bytes = encode_png(&frame).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
