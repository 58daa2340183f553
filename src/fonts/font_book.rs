//! Per-document set of loaded fonts.

use std::sync::Arc;

use indexmap::IndexMap;

use super::loaded_font::LoadedFont;
use super::{MeasureFn, ScriptHint};
use crate::error::{Error, Result};
use crate::layout::ContentBlock;

/// Resolves the measurement to use for a block.
pub trait MeasureLookup {
    /// Measurement for `block`'s font family.
    fn measure_for(&self, block: &ContentBlock) -> Result<MeasureFn>;
}

/// A single measurer applies to every block.
impl MeasureLookup for MeasureFn {
    fn measure_for(&self, _block: &ContentBlock) -> Result<MeasureFn> {
        Ok(self.clone())
    }
}

/// Fonts loaded for one document, keyed by requested family and script.
///
/// A family used by both an LTR and an RTL block is held once per script,
/// since each script resolves its own fallback.
#[derive(Debug, Clone, Default)]
pub struct FontBook {
    fonts: IndexMap<(String, ScriptHint), Arc<LoadedFont>>,
}

impl FontBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the font for `family` under the script it was loaded for.
    pub fn insert(&mut self, family: impl Into<String>, font: Arc<LoadedFont>) {
        self.fonts.insert((family.into(), font.script()), font);
    }

    /// Whether `family` has been loaded for `script`.
    pub fn contains(&self, family: &str, script: ScriptHint) -> bool {
        self.fonts.contains_key(&(family.to_string(), script))
    }

    /// Font loaded for `family` and `script`.
    pub fn get(&self, family: &str, script: ScriptHint) -> Result<&Arc<LoadedFont>> {
        self.fonts
            .get(&(family.to_string(), script))
            .ok_or_else(|| Error::FontNotLoaded(format!("{} ({:?})", family, script)))
    }

    /// Font for the family and direction of `block`.
    pub fn for_block(&self, block: &ContentBlock) -> Result<&Arc<LoadedFont>> {
        self.get(&block.font_family, ScriptHint::for_direction(block.direction))
    }

    /// Number of loaded `(family, script)` pairs.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether no font has been loaded.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Loaded `(family, script)` pairs in load order.
    pub fn families(&self) -> impl Iterator<Item = (&str, ScriptHint)> {
        self.fonts.keys().map(|(family, script)| (family.as_str(), *script))
    }
}

impl MeasureLookup for FontBook {
    fn measure_for(&self, block: &ContentBlock) -> Result<MeasureFn> {
        Ok(self.for_block(block)?.measure_fn())
    }
}
