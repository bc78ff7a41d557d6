//! Page images for the OCR fallback, via lopdf.
//!
//! Scanned PDFs carry each page as an image XObject (JPEG, TIFF, or raw
//! pixel data). Instead of rasterizing through a full renderer, the fallback
//! recovers that embedded image per page and re-encodes it to PNG.

use image::ImageOutputFormat;
use lopdf::{Document, Object, ObjectId};

use super::types::PageRenderer;
use super::ExtractionError;

pub struct EmbeddedImageRenderer;

impl PageRenderer for EmbeddedImageRenderer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        Ok(load(pdf_bytes)?.page_iter().count())
    }

    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        _dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError> {
        let doc = load(pdf_bytes)?;
        let page_ids: Vec<ObjectId> = doc.page_iter().collect();
        let &page_id = page_ids.get(page_index).ok_or_else(|| {
            ExtractionError::PdfParsing(format!(
                "page {} out of range ({} pages)",
                page_index,
                page_ids.len()
            ))
        })?;

        let raw = largest_page_image(&doc, page_id)?;

        // Re-encode so the OCR engine always sees one format.
        let img = image::load_from_memory(&raw).map_err(|e| {
            ExtractionError::ImageProcessing(format!("failed to decode page image: {e}"))
        })?;
        let png = encode_png(&img)?;

        tracing::debug!(
            page = page_index,
            raw_size = raw.len(),
            png_size = png.len(),
            "Recovered page image"
        );
        Ok(png)
    }
}

fn load(pdf_bytes: &[u8]) -> Result<Document, ExtractionError> {
    Document::load_mem(pdf_bytes)
        .map_err(|e| ExtractionError::PdfParsing(format!("failed to parse PDF: {e}")))
}

fn encode_png(img: &image::DynamicImage) -> Result<Vec<u8>, ExtractionError> {
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encode failed: {e}")))?;
    Ok(buf.into_inner())
}

/// The largest /Image XObject on a page — for scans, the page itself.
/// Walks page dict → /Resources → /XObject.
fn largest_page_image(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, ExtractionError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| ExtractionError::PdfParsing(format!("bad page object: {e}")))?;

    let resources = dict_entry(doc, page_dict, b"Resources")?;
    let xobjects = dict_entry(doc, resources, b"XObject")?;

    let mut largest: Option<Vec<u8>> = None;
    for (_name, obj) in xobjects.iter() {
        let stream = match deref(doc, obj) {
            Object::Stream(s) => s,
            _ => continue,
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .map(|s| matches!(s, Object::Name(n) if n == b"Image"))
            .unwrap_or(false);
        if !is_image {
            continue;
        }

        let bytes = image_stream_bytes(doc, stream)?;
        if largest.as_ref().map_or(true, |prev| bytes.len() > prev.len()) {
            largest = Some(bytes);
        }
    }

    largest
        .ok_or_else(|| ExtractionError::PdfParsing("no image XObjects on this page".into()))
}

/// Pull decodable image bytes out of a stream, whatever its filter chain.
fn image_stream_bytes(doc: &Document, stream: &lopdf::Stream) -> Result<Vec<u8>, ExtractionError> {
    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    // DCTDecode streams are JPEG files as-is; other streams sometimes hold a
    // complete TIFF/PNG. Either way the decoder can take them directly.
    if is_dct_encoded(&stream.dict) || image::load_from_memory(&content).is_ok() {
        return Ok(content);
    }

    // What's left is raw pixel data described by the stream dictionary.
    rebuild_raw_pixels(doc, &stream.dict, &content)
}

fn is_dct_encoded(dict: &lopdf::Dictionary) -> bool {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => n == b"DCTDecode",
        Ok(Object::Array(filters)) => filters
            .iter()
            .any(|f| matches!(f, Object::Name(n) if n == b"DCTDecode")),
        _ => false,
    }
}

/// Reassemble an image from raw pixels using /Width, /Height and the
/// channel count implied by /ColorSpace.
fn rebuild_raw_pixels(
    doc: &Document,
    dict: &lopdf::Dictionary,
    pixels: &[u8],
) -> Result<Vec<u8>, ExtractionError> {
    let width = int_entry(dict, b"Width")? as u32;
    let height = int_entry(dict, b"Height")? as u32;
    let channels = channel_count(doc, dict);

    let expected = (width as usize) * (height as usize) * (channels as usize);
    if pixels.len() < expected {
        return Err(ExtractionError::ImageProcessing(format!(
            "raw pixel buffer too small: {} bytes for {width}x{height}x{channels}",
            pixels.len()
        )));
    }

    let data = pixels[..expected].to_vec();
    let img = match channels {
        1 => image::GrayImage::from_raw(width, height, data)
            .map(image::DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(width, height, data)
            .map(image::DynamicImage::ImageRgb8),
        // CMYK lands here too; OCR does not care about color fidelity.
        4 => image::RgbaImage::from_raw(width, height, data)
            .map(image::DynamicImage::ImageRgba8),
        other => {
            return Err(ExtractionError::ImageProcessing(format!(
                "unsupported channel count: {other}"
            )))
        }
    }
    .ok_or_else(|| ExtractionError::ImageProcessing("pixel buffer shape mismatch".into()))?;

    encode_png(&img)
}

/// Channel count from /ColorSpace. Defaults to RGB when unrecognized.
fn channel_count(doc: &Document, dict: &lopdf::Dictionary) -> u32 {
    let cs = match dict.get(b"ColorSpace") {
        Ok(obj) => deref(doc, obj),
        Err(_) => return 3,
    };

    match cs {
        Object::Name(n) => match n.as_slice() {
            b"DeviceGray" => 1,
            b"DeviceCMYK" => 4,
            _ => 3,
        },
        Object::Array(arr) => match arr.first() {
            // Indexed output is palette indices, one byte per pixel
            Some(Object::Name(n)) if n == b"Indexed" => 1,
            Some(Object::Name(n)) if n == b"ICCBased" => icc_channel_count(doc, arr),
            _ => 3,
        },
        _ => 3,
    }
}

/// ICCBased color spaces carry the channel count in the ICC stream's /N.
fn icc_channel_count(doc: &Document, arr: &[Object]) -> u32 {
    if let Some(Object::Reference(id)) = arr.get(1) {
        if let Ok(Object::Stream(s)) = doc.get_object(*id) {
            return int_entry(&s.dict, b"N").map(|n| n as u32).unwrap_or(3);
        }
    }
    3
}

fn deref<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn dict_entry<'a>(
    doc: &'a Document,
    dict: &'a lopdf::Dictionary,
    key: &[u8],
) -> Result<&'a lopdf::Dictionary, ExtractionError> {
    let obj = dict.get(key).map_err(|_| {
        ExtractionError::PdfParsing(format!("missing /{}", String::from_utf8_lossy(key)))
    })?;
    deref(doc, obj).as_dict().map_err(|_| {
        ExtractionError::PdfParsing(format!(
            "/{} is not a dictionary",
            String::from_utf8_lossy(key)
        ))
    })
}

fn int_entry(dict: &lopdf::Dictionary, key: &[u8]) -> Result<i64, ExtractionError> {
    dict.get(key)
        .and_then(Object::as_i64)
        .map_err(|_| {
            ExtractionError::PdfParsing(format!(
                "missing or non-integer /{}",
                String::from_utf8_lossy(key)
            ))
        })
}

/// Mock renderer: fixed page count, one blank PNG per page.
pub struct MockPageRenderer {
    pages: usize,
    fail: bool,
}

impl MockPageRenderer {
    pub fn with_pages(pages: usize) -> Self {
        Self { pages, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            pages: 0,
            fail: true,
        }
    }
}

impl PageRenderer for MockPageRenderer {
    fn page_count(&self, _pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        if self.fail {
            return Err(ExtractionError::ImageProcessing("mock render failure".into()));
        }
        Ok(self.pages)
    }

    fn render_page(
        &self,
        _pdf_bytes: &[u8],
        page_index: usize,
        _dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError> {
        if self.fail || page_index >= self.pages {
            return Err(ExtractionError::ImageProcessing("mock render failure".into()));
        }
        let img = image::GrayImage::from_pixel(32, 32, image::Luma([200u8]));
        encode_png(&image::DynamicImage::ImageLuma8(img))
    }
}
