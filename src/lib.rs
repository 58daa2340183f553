// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Dastavez
//!
//! Bilingual (English / Urdu) document pagination and rendering engine.
//! Arbitrary-length legal text in left-to-right and right-to-left scripts is
//! turned into a fixed-page, print-ready PDF.
//!
//! ## Pipeline
//!
//! ```text
//! FontProvider → LineWrapper → PageCompositor → PageRenderer → DocumentAssembler
//! ```
//!
//! - **Fonts**: per-script faces from a `fontdb` database, shaped with
//!   `rustybuzz`, with a fallback chain that ends in built-in metrics
//! - **Wrapping**: greedy, measured on whole candidate lines, direction-agnostic
//! - **Pagination**: a resumable cursor; a block that crosses a page boundary
//!   continues at the exact line where it stopped
//! - **Rendering**: `tiny-skia` rasters at a configurable scale, LTR lines
//!   anchored left and RTL lines anchored right, header and footer in the
//!   margins
//! - **Assembly**: one full-bleed image per PDF page
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use dastavez::{DocumentPipeline, DocumentRequest, FontProvider, LayoutConfig, TranslationDirection};
//!
//! let fonts = Arc::new(FontProvider::with_system_fonts());
//! let pipeline = DocumentPipeline::new(fonts, LayoutConfig::translation());
//! let request = DocumentRequest::translation(english, urdu, TranslationDirection::EnToUr);
//! let document = pipeline.generate(&request)?;
//! std::fs::write(&document.file_name, &document.bytes)?;
//! ```
//!
//! ## Layout without rendering
//!
//! The layout stages work on logical pixels only and can drive another
//! backend:
//!
//! ```ignore
//! use dastavez::layout::{LineWrapper, PageCompositor};
//! use dastavez::fonts::{MeasureFn, SimpleFontMetrics};
//! use dastavez::config::BlockBreak;
//!
//! let measure = MeasureFn::new(SimpleFontMetrics::default());
//! let pages = PageCompositor::new(700.0, BlockBreak::Gap(12.0))
//!     .paginate(&blocks, &LineWrapper::new(500.0), &measure)?;
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Font loading and text measurement
pub mod fonts;

// Line wrapping and pagination
pub mod layout;

// Page rasterization
pub mod rendering;

// PDF objects and writing
pub mod object;
pub mod writer;

// End-to-end generation
pub mod pipeline;

// Re-exports
pub use config::{BlockBreak, LayoutConfig, Margins, PageGeometry, PageSize};
pub use error::{Error, Result};
pub use fonts::{FontBook, FontProvider, FontWarning, MeasureFn, ScriptHint, SimpleFontMetrics, TextMeasure};
pub use layout::{ContentBlock, Direction, LineWrapper, Page, PageCompositor, TextAlign, WrappedLine};
pub use pipeline::{DocumentKind, DocumentPipeline, DocumentRequest, OutputDocument, TranslationDirection};
pub use rendering::{ImageFormat, PageDecorations, PageRenderer, RenderOptions, RenderedPage};
pub use writer::{DocumentAssembler, PdfWriterConfig};
