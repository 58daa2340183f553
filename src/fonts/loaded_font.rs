//! A resolved font face and its shaping-based measurement.

use std::fmt;
use std::sync::Arc;

use rustybuzz::{Direction as HbDirection, Face as HbFace, UnicodeBuffer};

use super::{MeasureFn, ScriptHint, SimpleFontMetrics, TextMeasure};
use crate::layout::Direction;

/// Face backing a [`LoadedFont`].
#[derive(Clone)]
pub enum FontFace {
    /// Outline font data (TrueType/OpenType), shaped with rustybuzz.
    Outline {
        /// Raw font file bytes
        data: Arc<Vec<u8>>,
        /// Face index inside a collection
        index: u32,
    },
    /// No face resolved; fixed-advance metrics and block glyphs.
    Builtin(SimpleFontMetrics),
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::Outline { data, index } => f
                .debug_struct("Outline")
                .field("bytes", &data.len())
                .field("index", index)
                .finish(),
            FontFace::Builtin(metrics) => f.debug_tuple("Builtin").field(metrics).finish(),
        }
    }
}

/// Glyph positioned relative to the start of a shaped run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ShapedGlyph {
    pub glyph_id: u16,
    /// Pen x plus glyph offset, logical pixels
    pub x: f32,
    /// Glyph offset above the baseline, logical pixels
    pub y: f32,
}

/// Output of shaping one line.
#[derive(Debug, Clone)]
pub(crate) struct ShapedRun {
    pub glyphs: Vec<ShapedGlyph>,
    /// Total advance, logical pixels
    pub advance: f32,
    /// Font units to logical pixels
    pub scale: f32,
}

/// A font resolved by the [`FontProvider`](super::FontProvider).
#[derive(Debug)]
pub struct LoadedFont {
    requested_family: String,
    resolved_family: String,
    script: ScriptHint,
    face: FontFace,
}

impl LoadedFont {
    pub(crate) fn new(
        requested_family: impl Into<String>,
        resolved_family: impl Into<String>,
        script: ScriptHint,
        face: FontFace,
    ) -> Self {
        Self {
            requested_family: requested_family.into(),
            resolved_family: resolved_family.into(),
            script,
            face,
        }
    }

    /// Font backed by built-in metrics only.
    pub fn builtin(requested_family: impl Into<String>, script: ScriptHint) -> Self {
        Self::new(
            requested_family,
            "built-in metrics",
            script,
            FontFace::Builtin(SimpleFontMetrics::default()),
        )
    }

    /// Family the caller asked for.
    pub fn requested_family(&self) -> &str {
        &self.requested_family
    }

    /// Family actually used.
    pub fn resolved_family(&self) -> &str {
        &self.resolved_family
    }

    /// Script this font was loaded for.
    pub fn script(&self) -> ScriptHint {
        self.script
    }

    /// The underlying face.
    pub fn face(&self) -> &FontFace {
        &self.face
    }

    /// Whether a fallback replaced the requested family.
    pub fn is_fallback(&self) -> bool {
        self.requested_family != self.resolved_family
    }

    /// Measurement handle sharing this font.
    pub fn measure_fn(self: &Arc<Self>) -> MeasureFn {
        MeasureFn::from_arc(Arc::clone(self) as Arc<dyn TextMeasure>)
    }

    /// Shape `text` with rustybuzz.
    ///
    /// Returns `None` for built-in faces or data rustybuzz cannot parse. With
    /// `direction == None` the direction is guessed from the text, which is
    /// what measurement uses; advances do not depend on it.
    pub(crate) fn shape(
        &self,
        text: &str,
        font_size: f32,
        direction: Option<Direction>,
    ) -> Option<ShapedRun> {
        let FontFace::Outline { data, index } = &self.face else {
            return None;
        };
        let face = HbFace::from_slice(data, *index)?;
        let units_per_em = face.units_per_em().max(1) as f32;
        let scale = font_size / units_per_em;

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        if let Some(direction) = direction {
            buffer.set_direction(match direction {
                Direction::Ltr => HbDirection::LeftToRight,
                Direction::Rtl => HbDirection::RightToLeft,
            });
        }
        buffer.guess_segment_properties();

        let output = rustybuzz::shape(&face, &[], buffer);
        let mut glyphs = Vec::with_capacity(output.len());
        let mut pen_x = 0.0f32;
        for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
            glyphs.push(ShapedGlyph {
                glyph_id: info.glyph_id as u16,
                x: pen_x + pos.x_offset as f32 * scale,
                y: pos.y_offset as f32 * scale,
            });
            pen_x += pos.x_advance as f32 * scale;
        }

        Some(ShapedRun {
            glyphs,
            advance: pen_x,
            scale,
        })
    }
}

impl TextMeasure for LoadedFont {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match &self.face {
            FontFace::Builtin(metrics) => metrics.text_width(text, font_size),
            FontFace::Outline { .. } => match self.shape(text, font_size, None) {
                Some(run) => run.advance,
                None => SimpleFontMetrics::default().text_width(text, font_size),
            },
        }
    }
}
