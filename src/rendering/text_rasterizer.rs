//! Text rasterizer - fills shaped glyph outlines with tiny-skia.
//!
//! Outline faces are shaped by rustybuzz in the block's direction, so the
//! glyphs come back in visual order and are laid out left to right from the
//! anchor. Built-in faces have no outlines; they draw one block per character
//! so that the layout stays visible.

use rustybuzz::ttf_parser::{GlyphId, OutlineBuilder};
use rustybuzz::Face as HbFace;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Transform};

use crate::fonts::{FontFace, LoadedFont, SimpleFontMetrics};
use crate::layout::Direction;

/// Rasterizer for single lines of text.
pub(crate) struct TextRasterizer;

impl TextRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Draw `text` with its visual left edge at `x` and baseline at
    /// `baseline_y` (logical pixels). Returns the number of glyphs drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &self,
        pixmap: &mut Pixmap,
        font: &LoadedFont,
        text: &str,
        x: f32,
        baseline_y: f32,
        font_size: f32,
        direction: Direction,
        paint: &Paint,
        transform: Transform,
    ) -> usize {
        if text.is_empty() || font_size <= 0.0 {
            return 0;
        }
        match font.face() {
            FontFace::Outline { data, index } => {
                let (Some(face), Some(run)) = (
                    HbFace::from_slice(data, *index),
                    font.shape(text, font_size, Some(direction)),
                ) else {
                    log::warn!("Cannot shape with '{}', drawing block glyphs", font.resolved_family());
                    return self.draw_blocks(
                        pixmap,
                        &SimpleFontMetrics::default(),
                        text,
                        x,
                        baseline_y,
                        font_size,
                        direction,
                        paint,
                        transform,
                    );
                };

                let mut drawn = 0;
                for glyph in &run.glyphs {
                    let mut builder = GlyphPathBuilder::new(x + glyph.x, baseline_y - glyph.y, run.scale);
                    if face.outline_glyph(GlyphId(glyph.glyph_id), &mut builder).is_none() {
                        continue;
                    }
                    if let Some(path) = builder.finish() {
                        pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
                        drawn += 1;
                    }
                }
                drawn
            },
            FontFace::Builtin(metrics) => self.draw_blocks(
                pixmap, metrics, text, x, baseline_y, font_size, direction, paint, transform,
            ),
        }
    }

    /// Block glyphs: tall for capitals and digits, x-height for lowercase,
    /// medium for everything else. RTL text is laid out from the right.
    #[allow(clippy::too_many_arguments)]
    fn draw_blocks(
        &self,
        pixmap: &mut Pixmap,
        metrics: &SimpleFontMetrics,
        text: &str,
        x: f32,
        baseline_y: f32,
        font_size: f32,
        direction: Direction,
        paint: &Paint,
        transform: Transform,
    ) -> usize {
        let char_width = font_size * metrics.char_width_ratio;
        let count = text.chars().count();
        let mut path = PathBuilder::new();
        let mut drawn = 0;

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() || ch.is_control() {
                continue;
            }
            let slot = if direction.is_rtl() { count - 1 - i } else { i };
            let left = x + slot as f32 * char_width;
            let height = if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
                font_size * 0.7
            } else if ch.is_ascii_lowercase() {
                font_size * 0.5
            } else {
                font_size * 0.6
            };
            if let Some(rect) = Rect::from_ltrb(left, baseline_y - height, left + char_width * 0.8, baseline_y) {
                path.push_rect(rect);
                drawn += 1;
            }
        }

        if let Some(path) = path.finish() {
            pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
        }
        drawn
    }
}

/// Converts font-unit outlines (y up) to logical pixels (y down).
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(origin_x: f32, origin_y: f32, scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x,
            origin_y,
            scale,
        }
    }

    fn px(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }

    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.px(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.px(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.px(x1, y1);
        let (x, y) = self.px(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.px(x1, y1);
        let (x2, y2) = self.px(x2, y2);
        let (x, y) = self.px(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
