use super::types::OcrEngine;
use super::ExtractionError;

/// Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct BundledTesseract {
    tessdata_dir: std::path::PathBuf,
    lang: String,
}

#[cfg(feature = "ocr")]
impl BundledTesseract {
    /// Initialize against a tessdata directory. English data must be
    /// present; anything else is opt-in via [`with_languages`].
    ///
    /// [`with_languages`]: BundledTesseract::with_languages
    pub fn new(tessdata_dir: &std::path::Path) -> Result<Self, ExtractionError> {
        if !tessdata_dir.join("eng.traineddata").exists() {
            return Err(ExtractionError::OcrInit(format!(
                "no eng.traineddata under {}",
                tessdata_dir.display()
            )));
        }
        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            lang: "eng".to_string(),
        })
    }

    /// Set language(s) for recognition (e.g. "eng", "eng+fra").
    pub fn with_languages(mut self, langs: &str) -> Self {
        self.lang = langs.to_string();
        self
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for BundledTesseract {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let tessdata = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| ExtractionError::OcrInit("invalid tessdata path".into()))?;

        let tess = tesseract::Tesseract::new(Some(tessdata), Some(&self.lang))
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        tess.get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))
    }
}

/// Mock engine: returns the configured text for every image.
pub struct MockOcrEngine {
    pub text: String,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}

/// Engine wired in when OCR is compiled out or tessdata is missing.
///
/// Every invocation fails, so a scanned PDF surfaces a processing failure
/// instead of placeholder text.
pub struct DisabledOcr;

impl OcrEngine for DisabledOcr {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Err(ExtractionError::OcrUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ocr_returns_configured_text() {
        let engine = MockOcrEngine::new("Invoice total: 1,240.00");
        let text = engine.ocr_image(b"fake_image_bytes").unwrap();
        assert_eq!(text, "Invoice total: 1,240.00");
    }

    #[test]
    fn disabled_ocr_always_fails() {
        let result = DisabledOcr.ocr_image(b"fake");
        assert!(matches!(result, Err(ExtractionError::OcrUnavailable)));
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn bundled_tesseract_rejects_missing_tessdata() {
        let dir = tempfile::tempdir().unwrap();
        let result = BundledTesseract::new(dir.path());
        assert!(matches!(result, Err(ExtractionError::OcrInit(_))));
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn bundled_tesseract_initializes_with_system_tessdata() {
        let tessdata_dir = std::path::Path::new("/usr/share/tesseract-ocr/5/tessdata");
        if !tessdata_dir.exists() {
            return; // Skip on systems without Tesseract
        }
        let engine = BundledTesseract::new(tessdata_dir).unwrap();
        assert_eq!(engine.lang, "eng");

        let engine = engine.with_languages("eng+deu");
        assert_eq!(engine.lang, "eng+deu");
    }
}
