//! Greedy line wrapping.
//!
//! Wrapping works on logical (storage) order and is identical for LTR and RTL
//! blocks; direction only matters when a line is drawn.

use super::block::ContentBlock;
use crate::fonts::MeasureFn;

/// Role of a wrapped line inside its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Part of the block heading
    Title,
    /// Part of the block body
    Body,
}

/// One output line. Never spans two blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    /// Line text, tokens in logical order separated by single spaces
    pub text: String,
    /// Index of the owning block
    pub block_index: usize,
    /// Title or body line
    pub kind: LineKind,
    /// Measured width; may exceed the wrap width for an over-long token
    pub width_px: f32,
    /// Vertical space the line occupies
    pub height_px: f32,
}

/// Wraps block text to a fixed width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineWrapper {
    max_width_px: f32,
}

impl LineWrapper {
    /// Create a wrapper for the given content width.
    pub fn new(max_width_px: f32) -> Self {
        Self { max_width_px }
    }

    /// Wrap `block` into lines: title lines first, then body lines.
    pub fn wrap(&self, block: &ContentBlock, block_index: usize, measure: &MeasureFn) -> Vec<WrappedLine> {
        let mut lines = Vec::new();

        if let Some(title) = block.title.as_deref().filter(|t| !t.trim().is_empty()) {
            let size = block.title_font_size();
            for (text, width_px) in self.wrap_text(title, size, measure) {
                lines.push(WrappedLine {
                    text,
                    block_index,
                    kind: LineKind::Title,
                    width_px,
                    height_px: block.title_line_height(),
                });
            }
        }

        for (text, width_px) in self.wrap_text(&block.body, block.body_font_size, measure) {
            lines.push(WrappedLine {
                text,
                block_index,
                kind: LineKind::Body,
                width_px,
                height_px: block.line_height_px,
            });
        }

        log::debug!(
            "Wrapped block {} into {} line(s) at {}px",
            block_index,
            lines.len(),
            self.max_width_px
        );
        lines
    }

    /// Wrap raw text, returning `(line, width)` pairs.
    ///
    /// Paragraphs are separated by line breaks; blank paragraphs yield empty
    /// lines. A token wider than the limit gets a line of its own.
    pub fn wrap_text(&self, text: &str, font_size: f32, measure: &MeasureFn) -> Vec<(String, f32)> {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines = Vec::new();

        for paragraph in normalized.split('\n') {
            let mut current = String::new();
            let mut current_width = 0.0f32;

            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                let width = measure.text_width(&candidate, font_size);

                if width <= self.max_width_px || current.is_empty() {
                    current = candidate;
                    current_width = width;
                } else {
                    lines.push((std::mem::take(&mut current), current_width));
                    current_width = measure.text_width(word, font_size);
                    current = word.to_string();
                }
            }

            // Also covers blank paragraphs, which keep their vertical space.
            lines.push((current, current_width));
        }

        lines
    }
}
