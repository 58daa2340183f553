//! Page rendering: composed pages to raster images.
//!
//! Pages are drawn with the pure-Rust `tiny-skia` library at
//! `scale_factor` device pixels per logical pixel, then encoded as PNG or
//! JPEG for embedding.
//!
//! ## Pipeline
//!
//! 1. Create a pixmap of the scaled page size and fill the background
//! 2. Shape each placed line with its block's font and direction
//! 3. Fill the glyph outlines at the line's anchor
//! 4. Draw the header and footer bands in the margins
//! 5. Encode to the output format

mod page_renderer;
mod path_rasterizer;
mod text_rasterizer;

pub use page_renderer::{PageDecorations, PageRenderer, RenderOptions, RenderedPage};

use serde::{Deserialize, Serialize};
use tiny_skia::{Color, Paint};

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    /// PNG format (lossless)
    #[default]
    Png,
    /// JPEG format (lossy, smaller file size)
    Jpeg,
}

/// Create an anti-aliased fill paint from an RGB triple.
pub(crate) fn create_fill_paint((r, g, b): (f32, f32, f32)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba(r, g, b, 1.0).unwrap_or(Color::BLACK));
    paint.anti_alias = true;
    paint
}
