use super::ExtractionError;

/// What the pipeline produced for a document.
///
/// "No text" is a value, not an error: callers branch on the tag and pick
/// the matching notice instead of catching anything.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Extracted(ExtractedText),
    NoText,
}

/// Non-blank text recovered from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    /// Page texts in page order, one trailing newline per page.
    pub text: String,
    pub method: ExtractionMethod,
    pub page_count: usize,
}

/// Which stage produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    PdfDirect,
    Ocr,
}

/// Direct text-layer extraction, one string per page in page order.
pub trait PdfTextSource {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Recovers a raster image for each page of a PDF.
pub trait PageRenderer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;

    /// Produce a PNG for the given zero-based page.
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError>;
}

/// Character recognition over a single page image.
pub trait OcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}
