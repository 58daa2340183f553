//! Path rasterizer - strokes the separator rules of the header and footer.

use super::create_fill_paint;
use tiny_skia::{LineCap, PathBuilder, Pixmap, Stroke, Transform};

/// Rasterizer for straight rules.
pub(crate) struct PathRasterizer {
    width: f32,
    color: (f32, f32, f32),
}

impl PathRasterizer {
    /// Create a rasterizer drawing hairline-grey rules.
    pub fn new() -> Self {
        Self {
            width: 0.5,
            color: (0.6, 0.6, 0.6),
        }
    }

    /// Stroke a horizontal rule from `x1` to `x2` at `y` (logical pixels).
    pub fn stroke_rule(&self, pixmap: &mut Pixmap, x1: f32, x2: f32, y: f32, transform: Transform) -> bool {
        if x2 <= x1 {
            return false;
        }
        let mut builder = PathBuilder::new();
        builder.move_to(x1, y);
        builder.line_to(x2, y);
        let Some(path) = builder.finish() else {
            return false;
        };

        let stroke = Stroke {
            width: self.width,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &create_fill_paint(self.color), &stroke, transform, None);
        true
    }
}

impl Default for PathRasterizer {
    fn default() -> Self {
        Self::new()
    }
}
