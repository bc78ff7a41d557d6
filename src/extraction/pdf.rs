use super::types::PdfTextSource;
use super::ExtractionError;

/// Text-layer extractor backed by the pdf-extract crate.
/// Covers digital PDFs with embedded text.
pub struct PdfTextExtractor;

impl PdfTextSource for PdfTextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))
    }
}

/// Mock text source: serves fixed pages, or fails like a corrupt file.
pub struct MockPdfText {
    pages: Vec<String>,
    fail: bool,
}

impl MockPdfText {
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            pages: Vec::new(),
            fail: true,
        }
    }
}

impl PdfTextSource for MockPdfText {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        if self.fail {
            return Err(ExtractionError::PdfParsing("mock parse failure".into()));
        }
        Ok(self.pages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a valid PDF with one page of text per entry, using lopdf.
    fn make_test_pdf(pages: &[&str]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        "F1" => font_id,
                    },
                },
            });
            kids.push(page_id);
        }

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
            "Count" => kids.len() as i64,
        });

        for &page_id in &kids {
            if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
                dict.set("Parent", pages_id);
            }
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extract_text_from_digital_pdf() {
        let pdf_bytes = make_test_pdf(&["Quarterly report, final draft"]);
        let pages = PdfTextExtractor.extract_pages(&pdf_bytes).unwrap();

        assert!(!pages.is_empty(), "Should extract at least one page");
        let full_text = pages.concat();
        assert!(
            full_text.contains("Quarterly") || full_text.contains("report"),
            "Expected page text, got: {full_text}"
        );
    }

    #[test]
    fn pages_come_back_in_page_order() {
        let pdf_bytes = make_test_pdf(&["alpha page", "beta page", "gamma page"]);
        let pages = PdfTextExtractor.extract_pages(&pdf_bytes).unwrap();

        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("alpha"));
        assert!(pages[1].contains("beta"));
        assert!(pages[2].contains("gamma"));
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let result = PdfTextExtractor.extract_pages(b"not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }

    #[test]
    fn mock_serves_configured_pages() {
        let mock = MockPdfText::with_pages(&["one", "two"]);
        let pages = mock.extract_pages(b"ignored").unwrap();
        assert_eq!(pages, vec!["one", "two"]);
    }

    #[test]
    fn mock_can_fail() {
        let mock = MockPdfText::failing();
        assert!(mock.extract_pages(b"ignored").is_err());
    }
}
