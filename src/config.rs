//! Layout configuration.
//!
//! All logical dimensions are in PDF points (1/72 inch). The pagination engine
//! treats one point as one logical pixel; the raster scale factor decides how
//! many device pixels each logical pixel becomes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rendering::ImageFormat;

/// Standard page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// A4 (210mm x 297mm)
    #[default]
    A4,
    /// US Letter (8.5" x 11")
    Letter,
    /// Legal (8.5" x 14"), common for court filings
    Legal,
    /// Custom dimensions in points
    Custom(f32, f32),
}

impl PageSize {
    /// Get dimensions in points (1 inch = 72 points).
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom(w, h) => (*w, *h),
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin (holds the header band)
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin (holds the footer band)
    pub bottom: f32,
    /// Left margin
    pub left: f32,
}

impl Margins {
    /// Same margin on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(48.0)
    }
}

/// What happens between two consecutive content blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BlockBreak {
    /// Vertical gap in logical pixels, counted against the page budget.
    /// Dropped when it would fall at the top of a fresh page.
    Gap(f32),
    /// Every block after the first starts on a fresh page.
    NewPage,
}

impl Default for BlockBreak {
    fn default() -> Self {
        BlockBreak::Gap(12.0)
    }
}

/// Complete layout configuration for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Logical page size
    pub page_size: PageSize,
    /// Margins on all four sides
    pub margins: Margins,
    /// Raster scale factor (device pixels per logical pixel)
    pub scale_factor: f32,
    /// Break between consecutive blocks
    pub block_break: BlockBreak,
    /// Draw the title/metadata header in the top margin
    pub show_header: bool,
    /// Draw the source label and page number in the bottom margin
    pub show_footer: bool,
    /// Label printed at the left of the footer
    pub source_label: String,
    /// Raster format used for the embedded page images
    pub image_format: ImageFormat,
    /// JPEG quality (1-100, only for JPEG format)
    pub jpeg_quality: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: Margins::default(),
            scale_factor: 2.0,
            block_break: BlockBreak::default(),
            show_header: true,
            show_footer: true,
            source_label: "Pakistan Legal Tools".to_string(),
            image_format: ImageFormat::Png,
            jpeg_quality: 85,
        }
    }
}

impl LayoutConfig {
    /// Create the default configuration (A4, 48pt margins, 2x raster).
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for bilingual translations: original and translation each
    /// start on their own page.
    pub fn translation() -> Self {
        Self {
            block_break: BlockBreak::NewPage,
            ..Self::default()
        }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the raster scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the break inserted between blocks.
    pub fn with_block_break(mut self, block_break: BlockBreak) -> Self {
        self.block_break = block_break;
        self
    }

    /// Toggle header and footer bands.
    pub fn with_decorations(mut self, header: bool, footer: bool) -> Self {
        self.show_header = header;
        self.show_footer = footer;
        self
    }

    /// Set the footer source label.
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Embed pages as JPEG with the given quality.
    pub fn as_jpeg(mut self, quality: u8) -> Self {
        self.image_format = ImageFormat::Jpeg;
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Derive the page geometry.
    ///
    /// Rejects non-finite or non-positive page dimensions and a non-positive
    /// scale factor. A content area that is empty or negative is *not* rejected
    /// here: it is the compositor's job to report it as a pagination deadlock.
    pub fn geometry(&self) -> Result<PageGeometry> {
        let (width, height) = self.page_size.dimensions();
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "page size must be positive, got {}x{}",
                width, height
            )));
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "scale factor must be positive, got {}",
                self.scale_factor
            )));
        }
        let m = self.margins;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(Error::InvalidConfig("margins must be finite and non-negative".to_string()));
        }

        Ok(PageGeometry {
            page_width: width,
            page_height: height,
            margins: m,
            scale_factor: self.scale_factor,
        })
    }
}

/// Resolved page geometry shared by the wrapper, compositor and renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Logical page width
    pub page_width: f32,
    /// Logical page height
    pub page_height: f32,
    /// Margins
    pub margins: Margins,
    /// Raster scale factor
    pub scale_factor: f32,
}

impl PageGeometry {
    /// Usable width passed to the line wrapper.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    /// Usable height passed to the page compositor.
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margins.top - self.margins.bottom
    }

    /// Raster dimensions in device pixels.
    pub fn raster_size(&self) -> (u32, u32) {
        (
            (self.page_width * self.scale_factor).ceil() as u32,
            (self.page_height * self.scale_factor).ceil() as u32,
        )
    }
}
