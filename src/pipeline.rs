//! End-to-end document generation.
//!
//! [`DocumentPipeline`] runs the full chain for one request:
//!
//! ```text
//! DocumentRequest ─► FontProvider ─► LineWrapper ─► PageCompositor
//!                                                        │
//!                 OutputDocument ◄─ DocumentAssembler ◄─ PageRenderer
//! ```
//!
//! The pipeline owns its configuration and shares a [`FontProvider`] with
//! any number of other pipelines; nothing else outlives a call.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, PageGeometry};
use crate::error::Result;
use crate::fonts::{FontBook, FontProvider, FontWarning, ScriptHint};
use crate::layout::{ContentBlock, Direction, LineWrapper, Page, PageCompositor};
use crate::rendering::{PageDecorations, PageRenderer, RenderOptions};
use crate::writer::{DocumentAssembler, PdfWriterConfig};

/// Family used for English blocks and for the header and footer.
pub const LATIN_FAMILY: &str = "Times New Roman";
/// Family used for Urdu blocks.
pub const URDU_FAMILY: &str = "Noto Nastaliq Urdu";

const LATIN_FONT_SIZE: f32 = 12.0;
const URDU_FONT_SIZE: f32 = 14.0;
/// Nastaliq stacks vertically; it needs more leading than Latin text.
const URDU_LINE_HEIGHT_RATIO: f32 = 2.0;

/// Direction of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationDirection {
    /// English source, Urdu translation
    EnToUr,
    /// Urdu source, English translation
    UrToEn,
}

impl TranslationDirection {
    /// Identifier used in file names (`en_to_ur`, `ur_to_en`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationDirection::EnToUr => "en_to_ur",
            TranslationDirection::UrToEn => "ur_to_en",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TranslationDirection::EnToUr => "English to Urdu",
            TranslationDirection::UrToEn => "Urdu to English",
        }
    }

    /// Direction of the source text.
    pub fn source(&self) -> Direction {
        match self {
            TranslationDirection::EnToUr => Direction::Ltr,
            TranslationDirection::UrToEn => Direction::Rtl,
        }
    }

    /// Direction of the translated text.
    pub fn target(&self) -> Direction {
        match self {
            TranslationDirection::EnToUr => Direction::Rtl,
            TranslationDirection::UrToEn => Direction::Ltr,
        }
    }
}

/// What a document is, for naming and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentKind {
    /// Original text followed by its translation
    Translation {
        /// Translation direction
        direction: TranslationDirection,
    },
    /// English and Urdu drafts of one document
    Draft,
    /// Caller-supplied blocks
    Custom,
}

/// A document to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Document title (header, metadata and file name)
    pub title: String,
    /// Document kind
    #[serde(flatten)]
    pub kind: DocumentKind,
    /// Content in reading order
    pub blocks: Vec<ContentBlock>,
}

/// A block in the house style for its direction.
pub fn styled_block(body: impl Into<String>, direction: Direction) -> ContentBlock {
    match direction {
        Direction::Ltr => ContentBlock::new(body, direction, LATIN_FAMILY, LATIN_FONT_SIZE),
        Direction::Rtl => ContentBlock::new(body, direction, URDU_FAMILY, URDU_FONT_SIZE)
            .with_line_height(URDU_FONT_SIZE * URDU_LINE_HEIGHT_RATIO),
    }
}

impl DocumentRequest {
    /// Original text followed by its translation.
    pub fn translation(
        original: impl Into<String>,
        translation: impl Into<String>,
        direction: TranslationDirection,
    ) -> Self {
        Self {
            title: "Legal Translation".to_string(),
            kind: DocumentKind::Translation { direction },
            blocks: vec![
                styled_block(original, direction.source()).with_title("Original Text"),
                styled_block(translation, direction.target()).with_title("Translation"),
            ],
        }
    }

    /// English draft followed by the Urdu draft.
    pub fn draft(document_title: impl Into<String>, draft_en: impl Into<String>, draft_ur: impl Into<String>) -> Self {
        Self {
            title: document_title.into(),
            kind: DocumentKind::Draft,
            blocks: vec![
                styled_block(draft_en, Direction::Ltr).with_title("English Draft"),
                styled_block(draft_ur, Direction::Rtl).with_title("Urdu Draft (اردو مسودہ)"),
            ],
        }
    }

    /// Arbitrary blocks under a title.
    pub fn custom(title: impl Into<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            title: title.into(),
            kind: DocumentKind::Custom,
            blocks,
        }
    }

    /// Download name for a document generated at `timestamp`.
    pub fn suggested_file_name(&self, timestamp: NaiveDateTime) -> String {
        let date = timestamp.format("%Y-%m-%d");
        match &self.kind {
            DocumentKind::Translation { direction } => {
                format!("legal_translation_{}_{}.pdf", direction.as_str(), date)
            },
            DocumentKind::Draft => format!("{}_draft_{}.pdf", slugify(&self.title), date),
            DocumentKind::Custom => format!("{}_{}.pdf", slugify(&self.title), date),
        }
    }

    /// Secondary header line.
    pub fn metadata_line(&self, timestamp: NaiveDateTime) -> String {
        let date = timestamp.format("%d %B %Y");
        match &self.kind {
            DocumentKind::Translation { direction } => format!("{} | {}", direction.label(), date),
            DocumentKind::Draft => format!("Bilingual draft | {}", date),
            DocumentKind::Custom => date.to_string(),
        }
    }

    fn subject(&self) -> String {
        match &self.kind {
            DocumentKind::Translation { direction } => format!("Legal translation ({})", direction.label()),
            DocumentKind::Draft => "Bilingual legal draft".to_string(),
            DocumentKind::Custom => self.title.clone(),
        }
    }
}

/// Lowercase ASCII words joined by underscores; `document` when nothing is left.
fn slugify(title: &str) -> String {
    let words: Vec<String> = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect();
    if words.is_empty() {
        "document".to_string()
    } else {
        words.join("_")
    }
}

/// Pages and fonts of a laid-out document.
#[derive(Debug)]
pub struct DocumentLayout {
    /// Composed pages, at least one
    pub pages: Vec<Page>,
    /// Fonts the pages were measured with
    pub fonts: FontBook,
    /// Font fallbacks taken while loading
    pub warnings: Vec<FontWarning>,
    /// Geometry the pages were composed for
    pub geometry: PageGeometry,
}

/// A finished document.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    /// PDF bytes
    pub bytes: Vec<u8>,
    /// Suggested download name
    pub file_name: String,
    /// Number of pages
    pub page_count: usize,
    /// Font fallbacks taken while producing the document
    pub warnings: Vec<FontWarning>,
}

impl OutputDocument {
    /// Write the PDF into `dir` under its suggested name; returns the path.
    pub fn save_in(&self, dir: impl AsRef<std::path::Path>) -> Result<std::path::PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Runs requests through layout, rendering and assembly.
pub struct DocumentPipeline {
    fonts: Arc<FontProvider>,
    config: LayoutConfig,
    writer: PdfWriterConfig,
}

impl DocumentPipeline {
    /// Pipeline using `fonts` and `config`.
    pub fn new(fonts: Arc<FontProvider>, config: LayoutConfig) -> Self {
        Self {
            fonts,
            config,
            writer: PdfWriterConfig::default(),
        }
    }

    /// Base PDF writer settings; title, subject and date are set per request.
    pub fn with_writer_config(mut self, writer: PdfWriterConfig) -> Self {
        self.writer = writer;
        self
    }

    /// Layout configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Shared font provider.
    pub fn fonts(&self) -> &Arc<FontProvider> {
        &self.fonts
    }

    /// Load fonts and paginate `blocks`.
    ///
    /// Fails before any wrapping when the raster surface for the configured
    /// page cannot be created. An empty document yields one empty page.
    pub fn layout(&self, blocks: &[ContentBlock]) -> Result<DocumentLayout> {
        self.layout_titled(blocks, None)
    }

    /// Like [`layout`](Self::layout), also loading the Urdu family when a
    /// header `title` is written right to left.
    fn layout_titled(&self, blocks: &[ContentBlock], title: Option<&str>) -> Result<DocumentLayout> {
        let geometry = self.config.geometry()?;
        PageRenderer::probe_surface(&geometry)?;

        let decorated = self.config.show_header || self.config.show_footer;
        let rtl_title = self.config.show_header && title.map(Direction::of_text) == Some(Direction::Rtl);
        let requests = blocks
            .iter()
            .map(|b| (b.font_family.as_str(), ScriptHint::for_direction(b.direction)))
            .chain(decorated.then_some((LATIN_FAMILY, ScriptHint::Latin)))
            .chain(rtl_title.then_some((URDU_FAMILY, ScriptHint::Urdu)));
        let (fonts, warnings) = self.fonts.load_book(requests)?;

        let wrapper = LineWrapper::new(geometry.content_width());
        let compositor = PageCompositor::new(geometry.content_height(), self.config.block_break);
        let mut pages = compositor.paginate(blocks, &wrapper, &fonts)?;
        if pages.is_empty() {
            log::debug!("No content lines; emitting one empty page");
            pages.push(Page {
                page_number: 1,
                placed_lines: Vec::new(),
                used_height_px: 0.0,
            });
        }

        Ok(DocumentLayout {
            pages,
            fonts,
            warnings,
            geometry,
        })
    }

    /// Generate `request` stamped with the current local time.
    pub fn generate(&self, request: &DocumentRequest) -> Result<OutputDocument> {
        self.generate_at(request, Local::now().naive_local())
    }

    /// Generate `request` stamped with `timestamp`.
    pub fn generate_at(&self, request: &DocumentRequest, timestamp: NaiveDateTime) -> Result<OutputDocument> {
        log::info!(
            "Generating '{}' ({} block(s), {:?})",
            request.title,
            request.blocks.len(),
            request.kind
        );

        let layout = self.layout_titled(&request.blocks, Some(&request.title))?;
        let page_count = layout.pages.len();

        let mut decorations = PageDecorations::none()
            .with_font_family(LATIN_FAMILY)
            .with_rtl_font_family(URDU_FAMILY);
        if self.config.show_header {
            decorations = decorations.with_header(request.title.clone(), Some(request.metadata_line(timestamp)));
        }
        if self.config.show_footer {
            decorations = decorations.with_footer(self.config.source_label.clone(), page_count);
        }

        let renderer = PageRenderer::new(RenderOptions::from_config(&self.config));
        let rendered = layout
            .pages
            .iter()
            .map(|page| renderer.render(page, &request.blocks, &layout.geometry, &layout.fonts, &decorations))
            .collect::<Result<Vec<_>>>()?;

        let writer = self
            .writer
            .clone()
            .with_title(request.title.clone())
            .with_subject(request.subject())
            .with_creation_date(timestamp);
        let writer = if writer.author.is_none() {
            writer.with_author(self.config.source_label.clone())
        } else {
            writer
        };
        let bytes = DocumentAssembler::new(writer).assemble(&rendered)?;

        let file_name = request.suggested_file_name(timestamp);
        log::info!("Generated {} ({} page(s), {} bytes)", file_name, page_count, bytes.len());

        Ok(OutputDocument {
            bytes,
            file_name,
            page_count,
            warnings: layout.warnings,
        })
    }
}
