//! PDF writing module.
//!
//! Rendered page images are wrapped into a PDF document, one image per page.
//!
//! ## Architecture
//!
//! ```text
//! RenderedPage[]
//!     ↓
//! [DocumentAssembler] (validates and orders pages)
//!     ↓
//! [PageImage] (PNG → Flate, JPEG → DCT image XObjects)
//!     ↓
//! [PdfWriter] (catalog, pages, info, xref, trailer)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ```ignore
//! use dastavez::writer::{DocumentAssembler, PdfWriterConfig};
//!
//! let assembler = DocumentAssembler::new(PdfWriterConfig::default().with_title("Bail Application"));
//! let bytes = assembler.assemble(&rendered_pages)?;
//! ```

mod assembler;
mod image_handler;
mod object_serializer;
mod pdf_writer;

pub use assembler::DocumentAssembler;
pub use image_handler::{ColorSpace, PageImage};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{PdfWriter, PdfWriterConfig};
