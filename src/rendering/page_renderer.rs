//! Page renderer - draws composed pages to raster images.

use std::sync::Arc;

use tiny_skia::{Color, Pixmap, Transform};

use super::path_rasterizer::PathRasterizer;
use super::text_rasterizer::TextRasterizer;
use super::{create_fill_paint, ImageFormat};
use crate::config::{LayoutConfig, PageGeometry};
use crate::error::{Error, Result};
use crate::fonts::{FontBook, LoadedFont, ScriptHint, TextMeasure};
use crate::layout::{ContentBlock, Direction, LineKind, Page, TextAlign};

const BODY_COLOR: (f32, f32, f32) = (0.0, 0.0, 0.0);
const TITLE_COLOR: (f32, f32, f32) = (0.1, 0.2, 0.45);
const BAND_COLOR: (f32, f32, f32) = (0.35, 0.35, 0.35);

/// Bands thinner than this are left empty.
const MIN_BAND_HEIGHT: f32 = 12.0;

/// Largest raster edge, in device pixels.
const MAX_RASTER_SIDE: u32 = 16_384;

/// Options for page rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output image format
    pub format: ImageFormat,
    /// JPEG quality (1-100, only for JPEG format)
    pub jpeg_quality: u8,
    /// Background color (None for transparent)
    pub background: Option<[f32; 4]>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            jpeg_quality: 85,
            background: Some([1.0, 1.0, 1.0, 1.0]),
        }
    }
}

impl RenderOptions {
    /// Options matching a layout configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            format: config.image_format,
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
            ..Default::default()
        }
    }

    /// Set transparent background.
    pub fn with_transparent_background(mut self) -> Self {
        self.background = None;
        self
    }

    /// Set JPEG format with quality.
    pub fn as_jpeg(mut self, quality: u8) -> Self {
        self.format = ImageFormat::Jpeg;
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

/// Header and footer content shared by every page of a document.
#[derive(Debug, Clone, Default)]
pub struct PageDecorations {
    /// Document title, centred in the header band
    pub title: Option<String>,
    /// Secondary header line (date, direction, ...)
    pub metadata: Option<String>,
    /// Footer label on the start side
    pub source_label: Option<String>,
    /// Total page count for "Page N of M"; no page numbers when zero
    pub total_pages: usize,
    /// Font used for both bands; built-in metrics when absent from the book
    pub font_family: String,
    /// Font for a right-to-left title, looked up for the Urdu script
    pub rtl_font_family: String,
}

impl PageDecorations {
    /// No header or footer.
    pub fn none() -> Self {
        Self::default()
    }

    /// Header with a title.
    pub fn with_header(mut self, title: impl Into<String>, metadata: Option<String>) -> Self {
        self.title = Some(title.into());
        self.metadata = metadata;
        self
    }

    /// Footer with a source label and page numbering.
    pub fn with_footer(mut self, source_label: impl Into<String>, total_pages: usize) -> Self {
        self.source_label = Some(source_label.into());
        self.total_pages = total_pages;
        self
    }

    /// Font family for the bands.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Font family for a title written in a right-to-left script.
    pub fn with_rtl_font_family(mut self, family: impl Into<String>) -> Self {
        self.rtl_font_family = family.into();
        self
    }

    /// Band font for text running in `direction`.
    fn font_for(&self, fonts: &FontBook, direction: Direction) -> Arc<LoadedFont> {
        let (family, script) = match direction {
            Direction::Ltr => (&self.font_family, ScriptHint::Latin),
            Direction::Rtl => (&self.rtl_font_family, ScriptHint::Urdu),
        };
        match fonts.get(family, script) {
            Ok(font) => Arc::clone(font),
            Err(_) => Arc::new(LoadedFont::builtin(family.as_str(), script)),
        }
    }

    fn has_header(&self) -> bool {
        self.title.is_some() || self.metadata.is_some()
    }

    fn has_footer(&self) -> bool {
        self.source_label.is_some() || self.total_pages > 0
    }
}

/// One rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 1-based page number
    pub page_number: usize,
    /// Encoded image data
    pub image_bytes: Vec<u8>,
    /// Image width in pixels
    pub width_px: u32,
    /// Image height in pixels
    pub height_px: u32,
    /// Encoding of `image_bytes`
    pub format: ImageFormat,
    /// Page width in points
    pub logical_width: f32,
    /// Page height in points
    pub logical_height: f32,
}

impl RenderedPage {
    /// Get the image data as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.image_bytes
    }
}

/// Which edge a line hugs once direction and alignment are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Left,
    Center,
    Right,
}

fn anchor_for(direction: Direction, align: TextAlign) -> Anchor {
    match (align, direction) {
        (TextAlign::Center, _) => Anchor::Center,
        (TextAlign::Start, Direction::Ltr) | (TextAlign::End, Direction::Rtl) => Anchor::Left,
        (TextAlign::Start, Direction::Rtl) | (TextAlign::End, Direction::Ltr) => Anchor::Right,
    }
}

/// Left x of a line of `width` between `left` and `right`.
fn anchor_x(anchor: Anchor, left: f32, right: f32, width: f32) -> f32 {
    match anchor {
        Anchor::Left => left,
        Anchor::Right => right - width,
        Anchor::Center => left + ((right - left) - width) / 2.0,
    }
}

/// Page renderer that converts composed pages to raster images.
pub struct PageRenderer {
    options: RenderOptions,
    path_rasterizer: PathRasterizer,
    text_rasterizer: TextRasterizer,
}

impl PageRenderer {
    /// Create a new page renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            path_rasterizer: PathRasterizer::new(),
            text_rasterizer: TextRasterizer::new(),
        }
    }

    /// Render options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Check that a raster surface for `geometry` can be created.
    pub fn probe_surface(geometry: &PageGeometry) -> Result<()> {
        Self::create_pixmap(geometry).map(|_| ())
    }

    fn create_pixmap(geometry: &PageGeometry) -> Result<Pixmap> {
        let (width, height) = geometry.raster_size();
        if width > MAX_RASTER_SIDE || height > MAX_RASTER_SIDE {
            return Err(Error::MeasurementContextUnavailable(format!(
                "{}x{} raster exceeds {}px per side",
                width, height, MAX_RASTER_SIDE
            )));
        }
        Pixmap::new(width, height).ok_or_else(|| {
            Error::MeasurementContextUnavailable(format!("failed to create {}x{} raster surface", width, height))
        })
    }

    /// Render a page to an image.
    pub fn render(
        &self,
        page: &Page,
        blocks: &[ContentBlock],
        geometry: &PageGeometry,
        fonts: &FontBook,
        decorations: &PageDecorations,
    ) -> Result<RenderedPage> {
        let mut pixmap = Self::create_pixmap(geometry)?;
        if let Some([r, g, b, a]) = self.options.background {
            pixmap.fill(Color::from_rgba(r, g, b, a).unwrap_or(Color::WHITE));
        }

        // Logical pixels (y down) to device pixels
        let transform = Transform::from_scale(geometry.scale_factor, geometry.scale_factor);
        let left = geometry.margins.left;
        let right = geometry.page_width - geometry.margins.right;

        for placed in &page.placed_lines {
            let line = &placed.line;
            let block = blocks.get(line.block_index).ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "page {} references block {} of {}",
                    page.page_number,
                    line.block_index,
                    blocks.len()
                ))
            })?;
            let font = fonts.for_block(block)?;

            let (size, color) = match line.kind {
                LineKind::Title => (block.title_font_size(), TITLE_COLOR),
                LineKind::Body => (block.body_font_size, BODY_COLOR),
            };
            let x = anchor_x(anchor_for(block.direction, block.align), left, right, line.width_px);
            let top = geometry.margins.top + placed.top_px;
            let baseline = top + (line.height_px + size * 0.7) / 2.0;

            self.text_rasterizer.draw_text(
                &mut pixmap,
                font,
                &line.text,
                x,
                baseline,
                size,
                block.direction,
                &create_fill_paint(color),
                transform,
            );
        }

        self.draw_decorations(&mut pixmap, page, geometry, fonts, decorations, transform);

        let image_bytes = match self.options.format {
            ImageFormat::Png => pixmap.encode_png().map_err(|e| Error::PageEncodingFailure {
                page: page.page_number,
                reason: format!("PNG encoding failed: {}", e),
            })?,
            ImageFormat::Jpeg => self.encode_jpeg(&pixmap, page.page_number)?,
        };

        log::debug!(
            "Rendered page {} ({} lines, {}x{}px, {} bytes)",
            page.page_number,
            page.placed_lines.len(),
            pixmap.width(),
            pixmap.height(),
            image_bytes.len()
        );

        Ok(RenderedPage {
            page_number: page.page_number,
            image_bytes,
            width_px: pixmap.width(),
            height_px: pixmap.height(),
            format: self.options.format,
            logical_width: geometry.page_width,
            logical_height: geometry.page_height,
        })
    }

    /// Header and footer bands inside the top and bottom margins.
    fn draw_decorations(
        &self,
        pixmap: &mut Pixmap,
        page: &Page,
        geometry: &PageGeometry,
        fonts: &FontBook,
        decorations: &PageDecorations,
        transform: Transform,
    ) {
        if !decorations.has_header() && !decorations.has_footer() {
            return;
        }

        let font = decorations.font_for(fonts, Direction::Ltr);
        let left = geometry.margins.left;
        let right = geometry.page_width - geometry.margins.right;
        let paint = create_fill_paint(BAND_COLOR);

        let band = geometry.margins.top;
        if decorations.has_header() && band >= MIN_BAND_HEIGHT {
            let title_size = (band * 0.3).min(14.0);
            let meta_size = (band * 0.2).min(9.0);
            if let Some(title) = &decorations.title {
                let direction = Direction::of_text(title);
                let title_font = decorations.font_for(fonts, direction);
                let width = title_font.text_width(title, title_size);
                let x = anchor_x(Anchor::Center, left, right, width);
                self.text_rasterizer.draw_text(
                    pixmap,
                    &title_font,
                    title,
                    x,
                    band * 0.45,
                    title_size,
                    direction,
                    &paint,
                    transform,
                );
            }
            if let Some(meta) = &decorations.metadata {
                let width = font.text_width(meta, meta_size);
                let x = anchor_x(Anchor::Center, left, right, width);
                self.text_rasterizer
                    .draw_text(pixmap, &font, meta, x, band * 0.75, meta_size, Direction::Ltr, &paint, transform);
            }
            self.path_rasterizer.stroke_rule(pixmap, left, right, band - 2.0, transform);
        } else if decorations.has_header() {
            log::debug!("Top margin {}pt too small for a header", band);
        }

        let band = geometry.margins.bottom;
        if decorations.has_footer() && band >= MIN_BAND_HEIGHT {
            let size = (band * 0.2).min(9.0);
            let rule_y = geometry.page_height - band + 2.0;
            let baseline = geometry.page_height - band * 0.45;
            self.path_rasterizer.stroke_rule(pixmap, left, right, rule_y, transform);

            if let Some(label) = &decorations.source_label {
                self.text_rasterizer
                    .draw_text(pixmap, &font, label, left, baseline, size, Direction::Ltr, &paint, transform);
            }
            if decorations.total_pages > 0 {
                let numbering = format!("Page {} of {}", page.page_number, decorations.total_pages);
                let x = anchor_x(Anchor::Right, left, right, font.text_width(&numbering, size));
                self.text_rasterizer
                    .draw_text(pixmap, &font, &numbering, x, baseline, size, Direction::Ltr, &paint, transform);
            }
        } else if decorations.has_footer() {
            log::debug!("Bottom margin {}pt too small for a footer", band);
        }
    }

    /// Encode pixmap to JPEG format.
    fn encode_jpeg(&self, pixmap: &Pixmap, page: usize) -> Result<Vec<u8>> {
        use image::codecs::jpeg::JpegEncoder;
        use image::ImageBuffer;

        let width = pixmap.width();
        let height = pixmap.height();

        // Flatten premultiplied RGBA onto white; JPEG has no alpha
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        for chunk in pixmap.data().chunks(4) {
            let cover = 255 - chunk[3];
            rgb_data.push(chunk[0].saturating_add(cover));
            rgb_data.push(chunk[1].saturating_add(cover));
            rgb_data.push(chunk[2].saturating_add(cover));
        }

        let img: ImageBuffer<image::Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(width, height, rgb_data).ok_or_else(|| Error::PageEncodingFailure {
                page,
                reason: "failed to create image buffer".to_string(),
            })?;

        let mut output = Vec::new();
        JpegEncoder::new_with_quality(&mut output, self.options.jpeg_quality)
            .encode_image(&img)
            .map_err(|e| Error::PageEncodingFailure {
                page,
                reason: format!("JPEG encoding failed: {}", e),
            })?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Margins, PageSize};
    use crate::layout::{PlacedLine, WrappedLine};

    fn geometry() -> PageGeometry {
        LayoutConfig::default()
            .with_page_size(PageSize::Custom(200.0, 120.0))
            .with_margins(Margins::uniform(20.0))
            .with_scale_factor(1.0)
            .geometry()
            .unwrap()
    }

    fn book() -> FontBook {
        let mut book = FontBook::new();
        book.insert("Latin", Arc::new(LoadedFont::builtin("Latin", ScriptHint::Latin)));
        book.insert("Urdu", Arc::new(LoadedFont::builtin("Urdu", ScriptHint::Urdu)));
        book
    }

    fn single_line_page(text: &str, width_px: f32) -> Page {
        Page {
            page_number: 1,
            placed_lines: vec![PlacedLine {
                line: WrappedLine {
                    text: text.to_string(),
                    block_index: 0,
                    kind: LineKind::Body,
                    width_px,
                    height_px: 15.0,
                },
                top_px: 0.0,
            }],
            used_height_px: 15.0,
        }
    }

    fn ink_columns(png: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(png).unwrap().to_rgb8();
        let mut min_x = u32::MAX;
        let mut max_x = 0;
        for (x, _, p) in img.enumerate_pixels() {
            if p.0[0] < 128 {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
            }
        }
        (min_x, max_x)
    }

    #[test]
    fn test_render_options_default() {
        let opts = RenderOptions::default();
        assert_eq!(opts.format, ImageFormat::Png);
        assert_eq!(opts.jpeg_quality, 85);
        assert!(opts.background.is_some());
    }

    #[test]
    fn test_render_options_as_jpeg_clamps_quality() {
        let opts = RenderOptions::default().as_jpeg(0);
        assert_eq!(opts.format, ImageFormat::Jpeg);
        assert_eq!(opts.jpeg_quality, 1);
    }

    #[test]
    fn test_anchor_combinations() {
        assert_eq!(anchor_for(Direction::Ltr, TextAlign::Start), Anchor::Left);
        assert_eq!(anchor_for(Direction::Rtl, TextAlign::Start), Anchor::Right);
        assert_eq!(anchor_for(Direction::Ltr, TextAlign::End), Anchor::Right);
        assert_eq!(anchor_for(Direction::Rtl, TextAlign::End), Anchor::Left);
        assert_eq!(anchor_for(Direction::Rtl, TextAlign::Center), Anchor::Center);
        assert_eq!(anchor_x(Anchor::Right, 20.0, 180.0, 60.0), 120.0);
        assert_eq!(anchor_x(Anchor::Center, 20.0, 180.0, 60.0), 70.0);
    }

    #[test]
    fn test_ltr_line_hugs_left_margin() {
        let blocks = vec![ContentBlock::new("abc", Direction::Ltr, "Latin", 10.0)];
        let page = single_line_page("abc", 18.0);
        let rendered = PageRenderer::new(RenderOptions::default())
            .render(&page, &blocks, &geometry(), &book(), &PageDecorations::none())
            .unwrap();
        assert_eq!((rendered.width_px, rendered.height_px), (200, 120));
        let (min_x, max_x) = ink_columns(&rendered.image_bytes);
        assert!((20..=21).contains(&min_x), "min_x = {}", min_x);
        assert!(max_x < 40);
    }

    #[test]
    fn test_rtl_line_hugs_right_margin() {
        let text = "ابج";
        let blocks = vec![ContentBlock::new(text, Direction::Rtl, "Urdu", 10.0)];
        let page = single_line_page(text, 18.0);
        let rendered = PageRenderer::new(RenderOptions::default())
            .render(&page, &blocks, &geometry(), &book(), &PageDecorations::none())
            .unwrap();
        let (min_x, max_x) = ink_columns(&rendered.image_bytes);
        assert!(min_x >= 160, "min_x = {}", min_x);
        assert!(max_x <= 180);
    }

    #[test]
    fn test_raster_is_scaled() {
        let geometry = PageGeometry {
            scale_factor: 2.0,
            ..geometry()
        };
        let blocks = vec![ContentBlock::new("abc", Direction::Ltr, "Latin", 10.0)];
        let rendered = PageRenderer::new(RenderOptions::default())
            .render(&single_line_page("abc", 18.0), &blocks, &geometry, &book(), &PageDecorations::none())
            .unwrap();
        assert_eq!((rendered.width_px, rendered.height_px), (400, 240));
        assert_eq!((rendered.logical_width, rendered.logical_height), (200.0, 120.0));
    }

    #[test]
    fn test_jpeg_output() {
        let blocks = vec![ContentBlock::new("abc", Direction::Ltr, "Latin", 10.0)];
        let rendered = PageRenderer::new(RenderOptions::default().as_jpeg(80))
            .render(&single_line_page("abc", 18.0), &blocks, &geometry(), &book(), &PageDecorations::none())
            .unwrap();
        assert_eq!(rendered.format, ImageFormat::Jpeg);
        assert_eq!(&rendered.image_bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_missing_font_is_an_error() {
        let blocks = vec![ContentBlock::new("abc", Direction::Ltr, "Nowhere", 10.0)];
        let result = PageRenderer::new(RenderOptions::default()).render(
            &single_line_page("abc", 18.0),
            &blocks,
            &geometry(),
            &book(),
            &PageDecorations::none(),
        );
        assert!(matches!(result, Err(Error::FontNotLoaded(_))));
    }

    #[test]
    fn test_unknown_block_is_an_error() {
        let result = PageRenderer::new(RenderOptions::default()).render(
            &single_line_page("abc", 18.0),
            &[],
            &geometry(),
            &book(),
            &PageDecorations::none(),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_decorations_stay_in_margins() {
        let page = Page {
            page_number: 2,
            placed_lines: Vec::new(),
            used_height_px: 0.0,
        };
        let decorations = PageDecorations::none()
            .with_header("Bail Application", Some("2026-10-19".to_string()))
            .with_footer("Pakistan Legal Tools", 3)
            .with_font_family("Latin");
        let rendered = PageRenderer::new(RenderOptions::default())
            .render(&page, &[], &geometry(), &book(), &decorations)
            .unwrap();

        let img = image::load_from_memory(&rendered.image_bytes).unwrap().to_rgb8();
        let mut header_ink = 0;
        let mut footer_ink = 0;
        for (_, y, p) in img.enumerate_pixels() {
            if p.0[0] < 200 {
                assert!(y < 20 || y >= 100, "ink in body area at y = {}", y);
                if y < 20 {
                    header_ink += 1;
                } else {
                    footer_ink += 1;
                }
            }
        }
        assert!(header_ink > 0);
        assert!(footer_ink > 0);
    }

    #[test]
    fn test_rtl_title_uses_urdu_font() {
        let book = book();
        let decorations = PageDecorations::none()
            .with_header("درخواست", None)
            .with_font_family("Latin")
            .with_rtl_font_family("Urdu");

        let rtl = decorations.font_for(&book, Direction::Rtl);
        assert!(Arc::ptr_eq(&rtl, book.get("Urdu", ScriptHint::Urdu).unwrap()));
        let ltr = decorations.font_for(&book, Direction::Ltr);
        assert!(Arc::ptr_eq(&ltr, book.get("Latin", ScriptHint::Latin).unwrap()));

        // Not in the book: built-in metrics for the title's script
        let missing = PageDecorations::none().with_rtl_font_family("Nowhere");
        let font = missing.font_for(&book, Direction::Rtl);
        assert_eq!(font.script(), ScriptHint::Urdu);
        assert!(matches!(font.face(), crate::fonts::FontFace::Builtin(_)));
    }

    #[test]
    fn test_oversized_surface_is_unavailable() {
        let geometry = PageGeometry {
            page_width: 1.0e6,
            page_height: 1.0e6,
            margins: Margins::uniform(10.0),
            scale_factor: 10.0,
        };
        assert!(matches!(
            PageRenderer::probe_surface(&geometry),
            Err(Error::MeasurementContextUnavailable(_))
        ));
    }
}
