//! Image XObjects for rendered pages.
//!
//! - **JPEG**: passed through with the `DCTDecode` filter
//! - **PNG**: decoded, pixels re-compressed with `FlateDecode`; a non-opaque
//!   alpha channel becomes a soft mask

use std::io::{Cursor, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder};

use crate::error::{Error, Result};
use crate::object::{Dict, Object};
use crate::rendering::{ImageFormat, RenderedPage};

/// Color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
}

impl ColorSpace {
    /// PDF name of this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }
}

/// Filter applied to the stored pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    Dct,
    Flate,
}

/// A rendered page prepared for embedding.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space
    pub color_space: ColorSpace,
    filter: Filter,
    data: Vec<u8>,
    soft_mask: Option<Vec<u8>>,
}

impl PageImage {
    /// Prepare `page` for embedding. Any decode or compression problem is
    /// reported as a [`Error::PageEncodingFailure`] for that page.
    pub fn from_rendered(page: &RenderedPage) -> Result<Self> {
        let failure = |reason: String| Error::PageEncodingFailure {
            page: page.page_number,
            reason,
        };

        let image = match page.format {
            ImageFormat::Jpeg => Self::from_jpeg(page.image_bytes.clone()),
            ImageFormat::Png => Self::from_png(&page.image_bytes),
        }
        .map_err(failure)?;

        if (image.width, image.height) != (page.width_px, page.height_px) {
            return Err(failure(format!(
                "image is {}x{} but the page reports {}x{}",
                image.width, image.height, page.width_px, page.height_px
            )));
        }
        Ok(image)
    }

    /// Wrap JPEG data without transcoding.
    fn from_jpeg(data: Vec<u8>) -> std::result::Result<Self, String> {
        let decoder = JpegDecoder::new(Cursor::new(&data)).map_err(|e| format!("invalid JPEG: {}", e))?;
        let (width, height) = decoder.dimensions();
        let color_space = match decoder.color_type() {
            ColorType::L8 | ColorType::L16 => ColorSpace::DeviceGray,
            _ => ColorSpace::DeviceRGB,
        };
        Ok(Self {
            width,
            height,
            color_space,
            filter: Filter::Dct,
            data,
            soft_mask: None,
        })
    }

    /// Decode PNG data and compress the raw pixels.
    fn from_png(data: &[u8]) -> std::result::Result<Self, String> {
        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| format!("invalid PNG: {}", e))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let soft_mask = if alpha.iter().all(|&a| a == 255) {
            None
        } else {
            Some(compress(&alpha)?)
        };

        Ok(Self {
            width,
            height,
            color_space: ColorSpace::DeviceRGB,
            filter: Filter::Flate,
            data: compress(&rgb)?,
            soft_mask,
        })
    }

    /// Whether the image carries an alpha mask.
    pub fn has_soft_mask(&self) -> bool {
        self.soft_mask.is_some()
    }

    /// Size of the stored (encoded) pixel data.
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }

    /// Image XObject stream; `smask` is the soft mask object, when written.
    pub fn xobject(&self, smask: Option<u32>) -> Object {
        let mut dict = image_dict(self.width, self.height, self.color_space);
        let filter = match self.filter {
            Filter::Dct => "DCTDecode",
            Filter::Flate => "FlateDecode",
        };
        dict.insert("Filter".to_string(), Object::name(filter));
        if let Some(id) = smask {
            dict.insert("SMask".to_string(), Object::reference(id));
        }
        Object::Stream {
            dict,
            data: bytes::Bytes::from(self.data.clone()),
        }
    }

    /// Soft mask XObject stream, if the image has one.
    pub fn soft_mask_xobject(&self) -> Option<Object> {
        self.soft_mask.as_ref().map(|mask| {
            let mut dict = image_dict(self.width, self.height, ColorSpace::DeviceGray);
            dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            Object::Stream {
                dict,
                data: bytes::Bytes::from(mask.clone()),
            }
        })
    }
}

fn image_dict(width: u32, height: u32, color_space: ColorSpace) -> Dict {
    let mut dict = Dict::new();
    dict.insert("Type".to_string(), Object::name("XObject"));
    dict.insert("Subtype".to_string(), Object::name("Image"));
    dict.insert("Width".to_string(), Object::Integer(width as i64));
    dict.insert("Height".to_string(), Object::Integer(height as i64));
    dict.insert("ColorSpace".to_string(), Object::name(color_space.pdf_name()));
    dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
    dict
}

/// Zlib-compress `data` for the `FlateDecode` filter.
pub(crate) fn compress(data: &[u8]) -> std::result::Result<Vec<u8>, String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(|e| e.to_string())?;
    encoder.finish().map_err(|e| e.to_string())
}
