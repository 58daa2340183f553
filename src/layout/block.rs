//! Content blocks: the caller-owned input of the engine.

use serde::{Deserialize, Serialize};

/// Text direction of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Left-to-right (English)
    #[default]
    Ltr,
    /// Right-to-left (Urdu)
    Rtl,
}

impl Direction {
    /// Whether this is right-to-left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Direction::Rtl)
    }

    /// `Rtl` when `text` contains any Hebrew or Arabic-script character.
    pub fn of_text(text: &str) -> Self {
        let rtl = text
            .chars()
            .any(|c| matches!(c, '\u{0590}'..='\u{08FF}' | '\u{FB1D}'..='\u{FDFF}' | '\u{FE70}'..='\u{FEFF}'));
        if rtl {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }
}

/// Horizontal alignment, relative to the block's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    /// Leading edge: left for LTR, right for RTL
    #[default]
    Start,
    /// Centered
    Center,
    /// Trailing edge: right for LTR, left for RTL
    End,
}

/// Title lines are this much larger than body lines.
pub const TITLE_SCALE: f32 = 1.25;

/// One independently paginated unit of document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Optional heading drawn before the body
    #[serde(default)]
    pub title: Option<String>,
    /// Cleaned body text; `\n` separates paragraphs
    pub body: String,
    /// Text direction
    #[serde(default)]
    pub direction: Direction,
    /// Requested font family
    pub font_family: String,
    /// Body font size in logical pixels
    pub body_font_size: f32,
    /// Height of one body line in logical pixels
    pub line_height_px: f32,
    /// Alignment of every line in the block
    #[serde(default)]
    pub align: TextAlign,
}

impl ContentBlock {
    /// Create a block with a line height of 1.5 x the font size.
    pub fn new(
        body: impl Into<String>,
        direction: Direction,
        font_family: impl Into<String>,
        body_font_size: f32,
    ) -> Self {
        Self {
            title: None,
            body: body.into(),
            direction,
            font_family: font_family.into(),
            body_font_size,
            line_height_px: body_font_size * 1.5,
            align: TextAlign::Start,
        }
    }

    /// Set the heading.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the body line height.
    pub fn with_line_height(mut self, line_height_px: f32) -> Self {
        self.line_height_px = line_height_px;
        self
    }

    /// Set the alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Font size used for title lines.
    pub fn title_font_size(&self) -> f32 {
        self.body_font_size * TITLE_SCALE
    }

    /// Height of one title line.
    pub fn title_line_height(&self) -> f32 {
        self.line_height_px * TITLE_SCALE
    }
}
