//! Placard renders parametrized placeholder raster images.
//!
//! One immutable [`RenderSpec`] describes the image: a procedural background
//! style, colors, an optional dimension label and an optional anchored text
//! overlay. The [`render()`] compositor paints that spec onto any
//! [`PaintSurface`] at an arbitrary scale, so the same spec backs both a
//! scaled-down interactive preview and a full-resolution PNG export.
//!
//! - Resolve form-level edits into a spec with [`resolve()`]
//! - Paint with [`render()`] onto a [`PixmapSurface`] (CPU raster)
//! - Export with [`export::write_png`] / [`export::render_full`]
#![forbid(unsafe_code)]

pub mod export;
pub mod foundation;
pub mod render;
pub mod spec;

pub use foundation::error::{PlacardError, PlacardResult};
pub use render::compositor::render;
pub use render::pixmap::PixmapSurface;
pub use render::surface::{
    FrameRGBA, GradientStop, LinearGradient, PaintSurface, RadialGradient, TextAlign, TextShadow,
    TextStyle,
};
pub use spec::color::ColorSpec;
pub use spec::model::{
    ASPECT_RATIOS, GRADIENT_PRESETS, PRESET_RESOLUTIONS, RenderSpec, Style, TextAnchor,
    gradient_colors,
};
pub use spec::resolve::{
    ResolverState, SpecEdit, classify_aspect_ratio, preview_scale, resolve,
};
