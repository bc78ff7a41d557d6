//! Two-stage extraction: text layer first, OCR only when the whole document
//! yielded nothing.

use std::path::Path;

use super::ocr::DisabledOcr;
use super::pdf::PdfTextExtractor;
use super::renderer::EmbeddedImageRenderer;
use super::types::{
    ExtractedText, ExtractionMethod, ExtractionOutcome, OcrEngine, PageRenderer, PdfTextSource,
};
use super::ExtractionError;
use crate::config::OCR_RENDER_DPI;

/// Concrete two-stage extractor.
/// Uses trait objects for the stages, enabling dependency injection.
pub struct ExtractionPipeline {
    pdf: Box<dyn PdfTextSource + Send + Sync>,
    renderer: Box<dyn PageRenderer + Send + Sync>,
    ocr: Box<dyn OcrEngine + Send + Sync>,
}

impl ExtractionPipeline {
    pub fn new(
        pdf: Box<dyn PdfTextSource + Send + Sync>,
        renderer: Box<dyn PageRenderer + Send + Sync>,
        ocr: Box<dyn OcrEngine + Send + Sync>,
    ) -> Self {
        Self { pdf, renderer, ocr }
    }

    /// Run both stages against the PDF at `path`.
    ///
    /// Stage-one parse failures are caught and logged; stage-two failures
    /// are terminal for the request.
    pub fn extract(&self, path: &Path) -> Result<ExtractionOutcome, ExtractionError> {
        let pdf_bytes = std::fs::read(path)?;
        tracing::info!(
            path = %path.display(),
            bytes = pdf_bytes.len(),
            "Starting extraction"
        );

        // Step 1: the text layer. A corrupt or unparseable file is treated
        // as an empty text layer, not an error.
        let (text, page_count) = match self.pdf.extract_pages(&pdf_bytes) {
            Ok(pages) => {
                let count = pages.len();
                (concat_nonempty_pages(&pages), count)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Text-layer extraction failed, treating as empty");
                (String::new(), 0)
            }
        };

        if !text.trim().is_empty() {
            tracing::info!(
                pages = page_count,
                chars = text.chars().count(),
                "Text layer extracted"
            );
            return Ok(ExtractionOutcome::Extracted(ExtractedText {
                text,
                method: ExtractionMethod::PdfDirect,
                page_count,
            }));
        }

        // Step 2: OCR every page. Whole-document gate — reached only when
        // no page produced any text.
        self.ocr_pages(&pdf_bytes)
    }

    fn ocr_pages(&self, pdf_bytes: &[u8]) -> Result<ExtractionOutcome, ExtractionError> {
        let page_count = self.renderer.page_count(pdf_bytes)?;
        tracing::info!(pages = page_count, "Text layer empty, running OCR fallback");

        let mut text = String::new();
        for page_index in 0..page_count {
            let png = self
                .renderer
                .render_page(pdf_bytes, page_index, OCR_RENDER_DPI)?;
            let page_text = self.ocr.ocr_image(&png)?;
            text.push_str(&page_text);
            text.push('\n');
        }

        if text.trim().is_empty() {
            tracing::info!(pages = page_count, "OCR produced no text");
            return Ok(ExtractionOutcome::NoText);
        }

        tracing::info!(
            pages = page_count,
            chars = text.chars().count(),
            "OCR fallback extracted text"
        );
        Ok(ExtractionOutcome::Extracted(ExtractedText {
            text,
            method: ExtractionMethod::Ocr,
            page_count,
        }))
    }
}

/// Page texts joined in page order, a trailing newline per non-empty page.
fn concat_nonempty_pages(pages: &[String]) -> String {
    let mut out = String::new();
    for page in pages {
        if !page.is_empty() {
            out.push_str(page);
            out.push('\n');
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build the production pipeline.
///
/// OCR uses Tesseract when compiled in and tessdata is found; otherwise the
/// disabled engine, which fails the fallback outright.
pub fn build_pipeline() -> ExtractionPipeline {
    ExtractionPipeline::new(
        Box::new(PdfTextExtractor),
        Box::new(EmbeddedImageRenderer),
        build_ocr_engine(),
    )
}

fn build_ocr_engine() -> Box<dyn OcrEngine + Send + Sync> {
    #[cfg(feature = "ocr")]
    {
        if let Some(tessdata) = find_tessdata_dir() {
            match super::ocr::BundledTesseract::new(&tessdata) {
                Ok(engine) => {
                    tracing::info!(tessdata = %tessdata.display(), "Tesseract OCR initialized");
                    return Box::new(engine);
                }
                Err(err) => tracing::warn!(error = %err, "Tesseract init failed"),
            }
        }
    }

    tracing::warn!("OCR unavailable — scanned PDFs will report a processing failure");
    Box::new(DisabledOcr)
}

/// Locate a tessdata directory from the environment or system paths.
#[cfg(feature = "ocr")]
fn find_tessdata_dir() -> Option<std::path::PathBuf> {
    let mut candidates: Vec<std::path::PathBuf> = Vec::new();
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        candidates.push(prefix.into());
    }
    candidates.extend(
        [
            "/usr/share/tesseract-ocr/5/tessdata",
            "/usr/share/tesseract-ocr/4.00/tessdata",
            "/usr/share/tessdata",
            "/usr/local/share/tessdata",
            "/opt/homebrew/share/tessdata",
        ]
        .iter()
        .map(std::path::PathBuf::from),
    );

    candidates
        .into_iter()
        .find(|p| p.join("eng.traineddata").exists())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
