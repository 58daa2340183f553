//! Document assembler - rendered pages to one PDF.

use super::image_handler::PageImage;
use super::pdf_writer::{PdfWriter, PdfWriterConfig};
use crate::error::{Error, Result};
use crate::rendering::RenderedPage;

/// Combines rendered pages, in order, into a PDF document.
///
/// Each page becomes a PDF page of the page's logical size with its image
/// drawn edge to edge. A page that cannot be embedded fails the whole
/// document; no partial output is returned.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    config: PdfWriterConfig,
}

impl DocumentAssembler {
    /// Create an assembler writing with `config`.
    pub fn new(config: PdfWriterConfig) -> Self {
        Self { config }
    }

    /// Writer configuration in use.
    pub fn config(&self) -> &PdfWriterConfig {
        &self.config
    }

    /// Assemble `pages` into PDF bytes.
    pub fn assemble(&self, pages: &[RenderedPage]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(Error::InvalidConfig("no pages to assemble".to_string()));
        }

        let mut writer = PdfWriter::with_config(self.config.clone());
        for page in pages {
            let image = PageImage::from_rendered(page)?;
            writer
                .add_image_page(image, page.logical_width, page.logical_height)
                .map_err(|e| Error::PageEncodingFailure {
                    page: page.page_number,
                    reason: e.to_string(),
                })?;
        }

        let bytes = writer.finish()?;
        log::info!("Assembled {} page(s) into {} bytes", pages.len(), bytes.len());
        Ok(bytes)
    }
}
