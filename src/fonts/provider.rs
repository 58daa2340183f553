//! Font resolution with per-script fallback and a read-mostly cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use indexmap::IndexMap;

use super::font_book::FontBook;
use super::loaded_font::{FontFace, LoadedFont};
use super::{FontWarning, ScriptHint};
use crate::error::{Error, Result};

/// Resolutions kept before the oldest one is evicted.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Result of [`FontProvider::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoad {
    /// The font to measure and render with
    pub font: Arc<LoadedFont>,
    /// Set when the requested family was replaced by a fallback
    pub warning: Option<FontWarning>,
}

type CacheKey = (String, ScriptHint);

/// Loads fonts by family and script, caching every resolution.
///
/// The provider is the only state shared between documents. Lookups take a
/// read lock, so concurrent pipelines measuring with already loaded fonts do
/// not contend.
///
/// Two caches are kept. Face bytes are copied out of the database once per
/// face and shared by every font resolved to it, however many family names
/// point there. Resolutions are keyed by `(family, script)` and bounded; the
/// oldest is dropped once the capacity is reached.
pub struct FontProvider {
    db: RwLock<Database>,
    faces: RwLock<HashMap<ID, Arc<Vec<u8>>>>,
    cache: RwLock<IndexMap<CacheKey, FontLoad>>,
    capacity: usize,
}

impl FontProvider {
    /// Provider with an empty font database.
    ///
    /// Without registered fonts every request resolves to built-in metrics,
    /// which keeps layout deterministic across hosts.
    pub fn new() -> Self {
        Self::with_database(Database::new())
    }

    /// Provider seeded with the host's installed fonts.
    pub fn with_system_fonts() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} system font faces", db.len());
        Self::with_database(db)
    }

    /// Provider over a caller-prepared database.
    pub fn with_database(db: Database) -> Self {
        Self {
            db: RwLock::new(db),
            faces: RwLock::new(HashMap::new()),
            cache: RwLock::new(IndexMap::new()),
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Keep at most `capacity` resolutions (at least one).
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Register raw font bytes (TTF, OTF or a collection).
    ///
    /// Returns the number of faces added. Clears cached resolutions, since a
    /// previous fallback may now resolve to the new face.
    pub fn register_font_data(&self, data: Vec<u8>) -> Result<usize> {
        let faces = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
        for index in 0..faces {
            ttf_parser::Face::parse(&data, index)
                .map_err(|e| Error::Font(format!("face {} is not a valid font: {}", index, e)))?;
        }

        self.db
            .write()
            .map_err(|_| lock_poisoned("font database"))?
            .load_font_data(data);
        self.cache
            .write()
            .map_err(|_| lock_poisoned("font cache"))?
            .clear();
        log::debug!("Registered {} font face(s)", faces);
        Ok(faces as usize)
    }

    /// Number of faces known to the database.
    pub fn face_count(&self) -> usize {
        self.db.read().map(|db| db.len()).unwrap_or(0)
    }

    /// Number of cached resolutions.
    pub fn cached_resolutions(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Load `family` for `script`, falling back when it is unavailable.
    ///
    /// Resolution order: the requested family, the script's default families,
    /// the generic serif family, any installed face that covers the script,
    /// then built-in metrics. Fallback faces must map the script's
    /// [sample characters](ScriptHint::sample_chars). Anything past the first
    /// step carries a [`FontWarning::FontUnavailable`].
    pub fn load_font(&self, family: &str, script: ScriptHint) -> Result<FontLoad> {
        let key = (family.to_string(), script);
        if let Some(hit) = self
            .cache
            .read()
            .map_err(|_| lock_poisoned("font cache"))?
            .get(&key)
        {
            return Ok(hit.clone());
        }

        let load = self.resolve(family, script)?;

        let mut cache = self.cache.write().map_err(|_| lock_poisoned("font cache"))?;
        // Another thread may have resolved the same key in the meantime.
        if let Some(hit) = cache.get(&key) {
            return Ok(hit.clone());
        }
        if let Some(warning) = &load.warning {
            log::warn!("{}", warning);
        } else {
            log::debug!("Loaded font '{}' for {:?}", family, script);
        }
        if cache.len() >= self.capacity {
            if let Some(((evicted, evicted_script), _)) = cache.shift_remove_index(0) {
                log::debug!("Font cache full, evicting '{}' ({:?})", evicted, evicted_script);
            }
        }
        cache.insert(key, load.clone());
        Ok(load)
    }

    /// Async entry point: the only place the pipeline yields.
    #[cfg(feature = "async")]
    pub async fn load_font_async(self: Arc<Self>, family: &str, script: ScriptHint) -> Result<FontLoad> {
        let family = family.to_string();
        tokio::task::spawn_blocking(move || self.load_font(&family, script))
            .await
            .map_err(|e| Error::MeasurementContextUnavailable(format!("font loading task failed: {}", e)))?
    }

    /// Load every `(family, script)` pair into a [`FontBook`].
    ///
    /// Duplicate pairs are loaded once; a family requested for two scripts is
    /// loaded for each. Warnings are returned in request order.
    pub fn load_book<'a, I>(&self, requests: I) -> Result<(FontBook, Vec<FontWarning>)>
    where
        I: IntoIterator<Item = (&'a str, ScriptHint)>,
    {
        let mut book = FontBook::new();
        let mut warnings = Vec::new();
        for (family, script) in requests {
            if book.contains(family, script) {
                continue;
            }
            let load = self.load_font(family, script)?;
            if let Some(warning) = load.warning {
                warnings.push(warning);
            }
            book.insert(family, load.font);
        }
        Ok((book, warnings))
    }

    fn resolve(&self, family: &str, script: ScriptHint) -> Result<FontLoad> {
        let db = self.db.read().map_err(|_| lock_poisoned("font database"))?;

        if let Some(face) = query_face(&db, Family::Name(family)).and_then(|id| self.outline_face(&db, id)) {
            return Ok(FontLoad {
                font: Arc::new(LoadedFont::new(family, family, script, face)),
                warning: None,
            });
        }

        let named = script
            .default_families()
            .iter()
            .filter(|name| !name.eq_ignore_ascii_case(family))
            .map(|name| Family::Name(*name))
            .chain(std::iter::once(Family::Serif))
            .filter_map(|candidate| query_face(&db, candidate));
        let fallback_id = named
            .filter(|id| covers_script(&db, *id, script))
            .find(|id| self.outline_face(&db, *id).is_some())
            .or_else(|| covering_face(&db, script));

        if let Some(id) = fallback_id {
            if let Some(face) = self.outline_face(&db, id) {
                let resolved = face_family(&db, id);
                return Ok(fallback(family, &resolved, script, face));
            }
        }

        let builtin = LoadedFont::builtin(family, script);
        let resolved = builtin.resolved_family().to_string();
        Ok(FontLoad {
            font: Arc::new(builtin),
            warning: Some(FontWarning::FontUnavailable {
                requested: family.to_string(),
                script,
                fallback: resolved,
            }),
        })
    }

    /// Shared bytes for face `id`, copied out of the database on first use.
    /// Faces rustybuzz rejects yield `None`.
    fn outline_face(&self, db: &Database, id: ID) -> Option<FontFace> {
        let index = db.face(id)?.index;
        if let Some(data) = self.faces.read().ok()?.get(&id) {
            return Some(FontFace::Outline {
                data: Arc::clone(data),
                index,
            });
        }

        let data = db.with_face_data(id, |data, _| data.to_vec())?;
        rustybuzz::Face::from_slice(&data, index)?;
        let mut faces = self.faces.write().ok()?;
        let data = faces.entry(id).or_insert_with(|| Arc::new(data));
        Some(FontFace::Outline {
            data: Arc::clone(data),
            index,
        })
    }
}

impl Default for FontProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn fallback(requested: &str, resolved: &str, script: ScriptHint, face: FontFace) -> FontLoad {
    FontLoad {
        font: Arc::new(LoadedFont::new(requested, resolved, script, face)),
        warning: Some(FontWarning::FontUnavailable {
            requested: requested.to_string(),
            script,
            fallback: resolved.to_string(),
        }),
    }
}

fn query_face(db: &Database, family: Family<'_>) -> Option<ID> {
    let families = [family];
    db.query(&Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    })
}

/// Whether face `id` maps every sample character of `script`.
fn covers_script(db: &Database, id: ID, script: ScriptHint) -> bool {
    db.with_face_data(id, |data, index| {
        ttf_parser::Face::parse(data, index)
            .map(|face| script.sample_chars().iter().all(|c| face.glyph_index(*c).is_some()))
            .unwrap_or(false)
    })
    .unwrap_or(false)
}

/// Upright, regular-weight face covering `script`, preferring database order.
fn covering_face(db: &Database, script: ScriptHint) -> Option<ID> {
    db.faces()
        .filter(|info| covers_script(db, info.id, script))
        .min_by_key(|info| {
            (
                info.style != Style::Normal,
                info.stretch != Stretch::Normal,
                (i32::from(info.weight.0) - i32::from(Weight::NORMAL.0)).abs(),
            )
        })
        .map(|info| info.id)
}

fn face_family(db: &Database, id: ID) -> String {
    db.face(id)
        .and_then(|info| info.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| format!("face {:?}", id))
}

fn lock_poisoned(what: &str) -> Error {
    Error::MeasurementContextUnavailable(format!("{} lock poisoned", what))
}
