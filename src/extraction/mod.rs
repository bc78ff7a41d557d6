pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod renderer;
pub mod types;

pub use pipeline::{build_pipeline, ExtractionPipeline};
pub use types::{ExtractedText, ExtractionMethod, ExtractionOutcome};

use thiserror::Error;

/// Errors from the extraction pipeline.
///
/// Structural-parse failures never escape — the first stage catches and logs
/// them. Anything that does escape is terminal for the request.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Page image processing failed: {0}")]
    ImageProcessing(String),

    #[error("OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("OCR support is not available in this build")]
    OcrUnavailable,
}
