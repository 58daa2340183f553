//! Font loading and text measurement.
//!
//! Fonts are resolved per script through a [`FontProvider`], which caches the
//! result and falls back to a generic face (and finally to built-in metrics)
//! when a requested family is missing. Everything downstream only sees the
//! [`TextMeasure`] trait through a cloneable [`MeasureFn`] handle.
//!
//! ```ignore
//! use dastavez::fonts::{FontProvider, ScriptHint};
//!
//! let provider = FontProvider::with_system_fonts();
//! let load = provider.load_font("Noto Nastaliq Urdu", ScriptHint::Urdu)?;
//! if let Some(warning) = &load.warning {
//!     eprintln!("{}", warning);
//! }
//! let width = load.font.measure_fn().text_width("عدالت", 14.0);
//! ```

mod font_book;
mod loaded_font;
mod provider;

pub use font_book::{FontBook, MeasureLookup};
pub use loaded_font::{FontFace, LoadedFont};
pub use provider::{FontLoad, FontProvider};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::layout::Direction;

/// Text measurement in logical pixels.
pub trait TextMeasure: Send + Sync {
    /// Width of `text` rendered at `font_size` logical pixels.
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Approximate metrics using a fixed advance per character.
///
/// Used as the last-resort face when no outline font can be resolved, and in
/// tests where a deterministic measurement is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleFontMetrics {
    /// Average character width as proportion of font size
    pub char_width_ratio: f32,
}

impl Default for SimpleFontMetrics {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
        }
    }
}

impl SimpleFontMetrics {
    /// Metrics with a custom advance ratio.
    pub fn with_ratio(char_width_ratio: f32) -> Self {
        Self { char_width_ratio }
    }
}

impl TextMeasure for SimpleFontMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.char_width_ratio
    }
}

/// Cheap, cloneable measurement handle.
#[derive(Clone)]
pub struct MeasureFn(Arc<dyn TextMeasure>);

impl MeasureFn {
    /// Wrap any measurer.
    pub fn new(measure: impl TextMeasure + 'static) -> Self {
        Self(Arc::new(measure))
    }

    /// Wrap an already shared measurer.
    pub fn from_arc(measure: Arc<dyn TextMeasure>) -> Self {
        Self(measure)
    }

    /// Wrap a closure `(text, font_size) -> width`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, f32) -> f32 + Send + Sync + 'static,
    {
        Self(Arc::new(ClosureMeasure(f)))
    }

    /// Measure `text` at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.0.text_width(text, font_size)
    }
}

impl fmt::Debug for MeasureFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MeasureFn")
    }
}

struct ClosureMeasure<F>(F);

impl<F> TextMeasure for ClosureMeasure<F>
where
    F: Fn(&str, f32) -> f32 + Send + Sync,
{
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        (self.0)(text, font_size)
    }
}

/// Script a font is requested for; selects the default fallback families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptHint {
    /// Latin script (English)
    Latin,
    /// Arabic script as used for Urdu (Nastaliq/Naskh faces)
    Urdu,
}

impl ScriptHint {
    /// Default script for a text direction.
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Ltr => ScriptHint::Latin,
            Direction::Rtl => ScriptHint::Urdu,
        }
    }

    /// Preferred families tried after the requested one.
    pub fn default_families(&self) -> &'static [&'static str] {
        match self {
            ScriptHint::Latin => &["Times New Roman", "Liberation Serif", "DejaVu Serif"],
            ScriptHint::Urdu => &["Noto Nastaliq Urdu", "Jameel Noori Nastaleeq", "Noto Naskh Arabic"],
        }
    }

    /// Characters a face must map for it to stand in for this script.
    pub fn sample_chars(&self) -> &'static [char] {
        match self {
            ScriptHint::Latin => &['a', 'e', 'A', 'Z'],
            ScriptHint::Urdu => &['\u{0627}', '\u{0628}', '\u{062A}', '\u{0644}'],
        }
    }
}

/// Non-fatal font condition surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FontWarning {
    /// The requested family could not be loaded and a fallback is used.
    FontUnavailable {
        /// Family the caller asked for
        requested: String,
        /// Script the family was requested for
        script: ScriptHint,
        /// Family actually used ("built-in metrics" when no face resolved)
        fallback: String,
    },
}

impl fmt::Display for FontWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontWarning::FontUnavailable {
                requested,
                script,
                fallback,
            } => write!(
                f,
                "Font '{}' ({:?}) unavailable, using '{}' instead",
                requested, script, fallback
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_metrics_width() {
        let metrics = SimpleFontMetrics::default();
        assert_eq!(metrics.text_width("abcd", 10.0), 24.0);
        assert_eq!(metrics.text_width("", 10.0), 0.0);
    }

    #[test]
    fn test_simple_metrics_counts_chars_not_bytes() {
        let metrics = SimpleFontMetrics::with_ratio(0.5);
        // Five Urdu letters, ten UTF-8 bytes.
        assert_eq!(metrics.text_width("عدالت", 10.0), 25.0);
    }

    #[test]
    fn test_measure_fn_from_closure() {
        let measure = MeasureFn::from_fn(|text, size| text.len() as f32 * size);
        assert_eq!(measure.text_width("abc", 2.0), 6.0);
        let cloned = measure.clone();
        assert_eq!(cloned.text_width("ab", 1.0), 2.0);
    }

    #[test]
    fn test_script_for_direction() {
        assert_eq!(ScriptHint::for_direction(Direction::Ltr), ScriptHint::Latin);
        assert_eq!(ScriptHint::for_direction(Direction::Rtl), ScriptHint::Urdu);
        assert!(ScriptHint::Urdu.default_families().contains(&"Noto Nastaliq Urdu"));
    }

    #[test]
    fn test_warning_display() {
        let warning = FontWarning::FontUnavailable {
            requested: "Jameel Noori Nastaleeq".to_string(),
            script: ScriptHint::Urdu,
            fallback: "DejaVu Serif".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("Jameel Noori Nastaleeq"));
        assert!(msg.contains("DejaVu Serif"));
    }
}
