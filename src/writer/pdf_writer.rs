//! PDF document writer.
//!
//! Assembles a complete PDF out of full-page images: header, body, xref
//! table and trailer. Object ids are handed out in write order so the xref
//! table is a single contiguous section.

use chrono::NaiveDateTime;

use super::image_handler::{compress, PageImage};
use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::object::{Dict, Object};

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Creation timestamp for the Info dictionary
    pub creation_date: Option<NaiveDateTime>,
    /// Whether to compress page content streams
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: Some(concat!("dastavez ", env!("CARGO_PKG_VERSION")).to_string()),
            creation_date: None,
            compress: true,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set document keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set the creation timestamp.
    pub fn with_creation_date(mut self, date: NaiveDateTime) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    fn info_dict(&self) -> Object {
        let fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
        ];
        let mut entries: Vec<(&str, Object)> = fields
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (*key, Object::text(v))))
            .collect();
        if let Some(date) = self.creation_date {
            entries.push(("CreationDate", Object::text(&date.format("D:%Y%m%d%H%M%S").to_string())));
        }
        Object::dict(entries)
    }
}

struct ImagePage {
    image: PageImage,
    width: f32,
    height: f32,
}

/// PDF document writer for image pages.
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<ImagePage>,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Add a page of `width` x `height` points covered by `image`.
    pub fn add_image_page(&mut self, image: PageImage, width: f32, height: f32) -> Result<()> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "page {} has invalid size {}x{}",
                self.pages.len() + 1,
                width,
                height
            )));
        }
        self.pages.push(ImagePage { image, width, height });
        Ok(())
    }

    /// Build the complete PDF document.
    pub fn finish(self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::new();
        let mut output = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        output.extend_from_slice(format!("%PDF-{}\n", self.config.version).as_bytes());
        // Binary marker
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        // 1 = catalog, 2 = pages, 3 = info; then per page: page, content,
        // image and an optional soft mask.
        let catalog_id = 1;
        let pages_id = 2;
        let info_id = 3;
        let mut next_id = 4u32;

        let mut page_objects: Vec<(u32, Object)> = Vec::new();
        let mut kids = Vec::with_capacity(self.pages.len());

        for (index, page) in self.pages.iter().enumerate() {
            let page_id = next_id;
            let content_id = next_id + 1;
            let image_id = next_id + 2;
            let smask_id = page.image.has_soft_mask().then_some(next_id + 3);
            next_id += if smask_id.is_some() { 4 } else { 3 };

            let drawing = format!("q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ\n", fmt_num(page.width), fmt_num(page.height));
            let mut content_dict = Dict::new();
            let content = if self.config.compress {
                content_dict.insert("Filter".to_string(), Object::name("FlateDecode"));
                compress(drawing.as_bytes()).map_err(|reason| Error::PageEncodingFailure {
                    page: index + 1,
                    reason,
                })?
            } else {
                drawing.into_bytes()
            };

            let page_obj = Object::dict([
                ("Type", Object::name("Page")),
                ("Parent", Object::reference(pages_id)),
                ("MediaBox", Object::media_box(page.width, page.height)),
                (
                    "Resources",
                    Object::dict([("XObject", Object::dict([("Im0", Object::reference(image_id))]))]),
                ),
                ("Contents", Object::reference(content_id)),
            ]);

            kids.push(Object::reference(page_id));
            page_objects.push((page_id, page_obj));
            page_objects.push((
                content_id,
                Object::Stream {
                    dict: content_dict,
                    data: bytes::Bytes::from(content),
                },
            ));
            page_objects.push((image_id, page.image.xobject(smask_id)));
            if let (Some(id), Some(mask)) = (smask_id, page.image.soft_mask_xobject()) {
                page_objects.push((id, mask));
            }
        }

        let catalog = Object::dict([("Type", Object::name("Catalog")), ("Pages", Object::reference(pages_id))]);
        let pages = Object::dict([
            ("Type", Object::name("Pages")),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.pages.len() as i64)),
        ]);

        for (id, obj) in [(catalog_id, &catalog), (pages_id, &pages), (info_id, &self.config.info_dict())] {
            debug_assert_eq!(id as usize, offsets.len() + 1);
            offsets.push(output.len());
            serializer.write_indirect(&mut output, id, obj);
        }
        for (id, obj) in &page_objects {
            debug_assert_eq!(*id as usize, offsets.len() + 1);
            offsets.push(output.len());
            serializer.write_indirect(&mut output, *id, obj);
        }

        let xref_start = output.len();
        output.extend_from_slice(format!("xref\n0 {}\n", next_id).as_bytes());
        // Object 0 is always free
        output.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            output.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        let trailer = Object::dict([
            ("Size", Object::Integer(next_id as i64)),
            ("Root", Object::reference(catalog_id)),
            ("Info", Object::reference(info_id)),
        ]);
        output.extend_from_slice(b"trailer\n");
        serializer.write_object(&mut output, &trailer);
        output.extend_from_slice(format!("\nstartxref\n{}\n%%EOF\n", xref_start).as_bytes());

        log::debug!(
            "Wrote PDF with {} page(s), {} objects, {} bytes",
            self.pages.len(),
            next_id - 1,
            output.len()
        );
        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn fmt_num(value: f32) -> String {
    ObjectSerializer::new().serialize_to_string(&Object::Real(value as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::{ImageFormat, RenderedPage};

    fn page_image(width: u32, height: u32) -> PageImage {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        PageImage::from_rendered(&RenderedPage {
            page_number: 1,
            image_bytes: out.into_inner(),
            width_px: width,
            height_px: height,
            format: ImageFormat::Png,
            logical_width: width as f32,
            logical_height: height as f32,
        })
        .unwrap()
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_structure() {
        let mut writer = PdfWriter::with_config(PdfWriterConfig::default().with_compress(false));
        writer.add_image_page(page_image(4, 4), 595.0, 842.0).unwrap();
        writer.add_image_page(page_image(4, 4), 595.0, 842.0).unwrap();
        let pdf = text(&writer.finish().unwrap());

        assert!(pdf.starts_with("%PDF-1.7\n"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("/Type /Catalog"));
        assert!(pdf.contains("/Count 2"));
        assert!(pdf.contains("/MediaBox [0 0 595 842]"));
        assert!(pdf.contains("q\n595 0 0 842 0 0 cm\n/Im0 Do\nQ\n"));
        assert_eq!(pdf.matches("/Type /Page ").count(), 2);
        // 3 document objects + 3 per page, plus the free entry
        assert!(pdf.contains("xref\n0 10\n"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut writer = PdfWriter::new();
        writer.add_image_page(page_image(2, 2), 100.0, 100.0).unwrap();
        let pdf = writer.finish().unwrap();
        let as_text = text(&pdf);

        let xref = as_text.rfind("xref\n").unwrap();
        let entries: Vec<usize> = as_text[xref..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(pdf[*offset..].starts_with(expected.as_bytes()), "object {}", i + 1);
        }
    }

    #[test]
    fn test_metadata_in_info() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let config = PdfWriterConfig::default()
            .with_title("Legal Translation")
            .with_author("Pakistan Legal Tools")
            .with_subject("اردو")
            .with_creation_date(date);
        let mut writer = PdfWriter::with_config(config);
        writer.add_image_page(page_image(2, 2), 10.0, 10.0).unwrap();
        let pdf = text(&writer.finish().unwrap());
        assert!(pdf.contains("/Title (Legal Translation)"));
        assert!(pdf.contains("/Author (Pakistan Legal Tools)"));
        assert!(pdf.contains("/Subject <FEFF"));
        assert!(pdf.contains("/CreationDate (D:20261019093000)"));
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let mut writer = PdfWriter::new();
        assert!(matches!(
            writer.add_image_page(page_image(2, 2), 0.0, 10.0),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(writer.page_count(), 0);
    }
}
