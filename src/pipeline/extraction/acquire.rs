use std::collections::HashMap;
use std::sync::Arc;

use super::types::{OcrEngine, OcrProvider, PdfExtractor};
use super::ExtractionError;

/// Gets raw text out of an uploaded file: the embedded text layer for PDFs,
/// an OCR provider for images.
pub struct TextAcquisition {
    pdf: Arc<dyn PdfExtractor>,
    engines: HashMap<OcrProvider, Arc<dyn OcrEngine>>,
    default_api_key: Option<String>,
}

impl TextAcquisition {
    /// `default_api_key` is used when a request supplies no key of its own.
    pub fn new(pdf: Arc<dyn PdfExtractor>, default_api_key: Option<String>) -> Self {
        Self {
            pdf,
            engines: HashMap::new(),
            default_api_key,
        }
    }

    /// Register an OCR engine under its provider id.
    pub fn with_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.engines.insert(engine.provider(), engine);
        self
    }

    pub fn has_engine(&self, provider: OcrProvider) -> bool {
        self.engines.contains_key(&provider)
    }

    /// Extract text from an uploaded file.
    ///
    /// PDFs never fall back to OCR. For images the request key wins over
    /// the configured one.
    pub async fn extract_text(
        &self,
        file_bytes: &[u8],
        is_pdf: bool,
        provider: OcrProvider,
        api_key: Option<&str>,
    ) -> Result<String, ExtractionError> {
        if file_bytes.is_empty() {
            return Err(ExtractionError::InvalidInput("Uploaded file is empty".into()));
        }
        if is_pdf {
            return self.extract_pdf_text(file_bytes).await;
        }

        let engine = self
            .engines
            .get(&provider)
            .ok_or(ExtractionError::ProviderUnavailable(provider))?;

        let key = api_key
            .filter(|k| !k.trim().is_empty())
            .or(self.default_api_key.as_deref());
        if engine.requires_credential() && key.is_none() {
            return Err(ExtractionError::MissingCredential(provider));
        }

        let start = std::time::Instant::now();
        let text = engine.recognize(file_bytes, key).await?;
        if text.trim().is_empty() {
            return Err(ExtractionError::NoTextDetected);
        }

        tracing::info!(
            %provider,
            bytes = file_bytes.len(),
            text_len = text.len(),
            elapsed_ms = %start.elapsed().as_millis(),
            "OCR extraction complete"
        );
        Ok(text)
    }

    /// Join the text layer of every page with `\n`.
    pub async fn extract_pdf_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        let pdf = Arc::clone(&self.pdf);
        let bytes = pdf_bytes.to_vec();
        let pages = tokio::task::spawn_blocking(move || pdf.extract_text(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    ExtractionError::PdfParsing("PDF structure could not be read".into())
                } else {
                    ExtractionError::Task(e.to_string())
                }
            })??;

        let text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            return Err(ExtractionError::NoExtractableText);
        }

        tracing::info!(pages = pages.len(), text_len = text.len(), "PDF text extracted");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::types::PageExtraction;
    use crate::pipeline::extraction::{make_test_pdf, PdfTextExtractor};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// PDF stub returning fixed page texts.
    struct StubPdf(Vec<&'static str>);

    impl PdfExtractor for StubPdf {
        fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, text)| PageExtraction {
                    page_number: i + 1,
                    text: text.to_string(),
                })
                .collect())
        }
    }

    /// OCR stub: fixed text, records the key it was called with.
    struct StubOcr {
        provider: OcrProvider,
        needs_key: bool,
        text: &'static str,
        keys_seen: Mutex<Vec<Option<String>>>,
    }

    impl StubOcr {
        fn vision(text: &'static str) -> Self {
            Self {
                provider: OcrProvider::GoogleVision,
                needs_key: true,
                text,
                keys_seen: Mutex::new(Vec::new()),
            }
        }

        fn local(text: &'static str) -> Self {
            Self {
                provider: OcrProvider::Tesseract,
                needs_key: false,
                text,
                keys_seen: Mutex::new(Vec::new()),
            }
        }

        fn keys_seen(&self) -> Vec<Option<String>> {
            self.keys_seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OcrEngine for StubOcr {
        fn provider(&self) -> OcrProvider {
            self.provider
        }

        fn requires_credential(&self) -> bool {
            self.needs_key
        }

        async fn recognize(
            &self,
            _image_bytes: &[u8],
            api_key: Option<&str>,
        ) -> Result<String, ExtractionError> {
            self.keys_seen.lock().unwrap().push(api_key.map(String::from));
            Ok(self.text.to_string())
        }
    }

    fn with_pages(pages: Vec<&'static str>) -> TextAcquisition {
        TextAcquisition::new(Arc::new(StubPdf(pages)), None)
    }

    #[tokio::test]
    async fn pdf_pages_are_joined_with_newline() {
        let acquisition = with_pages(vec!["Page one text", "Page two text"]);
        let text = acquisition
            .extract_text(b"%PDF", true, OcrProvider::GoogleVision, None)
            .await
            .unwrap();
        assert_eq!(text, "Page one text\nPage two text");
    }

    #[tokio::test]
    async fn blank_pdf_pages_are_no_extractable_text() {
        let acquisition = with_pages(vec!["", "  \n "]);
        let err = acquisition.extract_pdf_text(b"%PDF").await.unwrap_err();
        assert!(matches!(err, ExtractionError::NoExtractableText));
    }

    #[tokio::test]
    async fn real_two_page_pdf() {
        let acquisition = TextAcquisition::new(Arc::new(PdfTextExtractor), None);
        let pdf = make_test_pdf(&["Amoxicillin", "Paracetamol"]);
        let text = acquisition.extract_pdf_text(&pdf).await.unwrap();
        assert!(text.contains("Amoxicillin"));
        assert!(text.contains("Paracetamol"));
        assert!(text.find("Amoxicillin") < text.find("Paracetamol"));
    }

    /// PDF parser that blows up on malformed input.
    struct PanickingPdf;

    impl PdfExtractor for PanickingPdf {
        fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
            panic!("font dictionary missing");
        }
    }

    #[tokio::test]
    async fn parser_panic_is_reported_as_pdf_parsing() {
        let acquisition = TextAcquisition::new(Arc::new(PanickingPdf), None);
        let err = acquisition.extract_pdf_text(b"%PDF").await.unwrap_err();
        assert!(matches!(err, ExtractionError::PdfParsing(_)));
    }

    #[tokio::test]
    async fn pdf_never_falls_back_to_ocr() {
        let ocr = Arc::new(StubOcr::vision("should not be used"));
        let acquisition = with_pages(vec![""]).with_engine(ocr.clone());
        let err = acquisition
            .extract_text(b"%PDF", true, OcrProvider::GoogleVision, Some("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NoExtractableText));
        assert!(ocr.keys_seen().is_empty());
    }

    #[tokio::test]
    async fn request_key_wins_over_configured_key() {
        let ocr = Arc::new(StubOcr::vision("Rx Dolo"));
        let acquisition = TextAcquisition::new(Arc::new(StubPdf(vec![])), Some("config-key".into()))
            .with_engine(ocr.clone());

        acquisition
            .extract_text(b"img", false, OcrProvider::GoogleVision, Some("request-key"))
            .await
            .unwrap();
        acquisition
            .extract_text(b"img", false, OcrProvider::GoogleVision, None)
            .await
            .unwrap();

        assert_eq!(
            ocr.keys_seen(),
            vec![Some("request-key".to_string()), Some("config-key".to_string())]
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_calling_provider() {
        let ocr = Arc::new(StubOcr::vision("Rx Dolo"));
        let acquisition = with_pages(vec![]).with_engine(ocr.clone());
        let err = acquisition
            .extract_text(b"img", false, OcrProvider::GoogleVision, Some("  "))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::MissingCredential(OcrProvider::GoogleVision)
        ));
        assert!(ocr.keys_seen().is_empty());
    }

    #[tokio::test]
    async fn local_engine_needs_no_key() {
        let acquisition = with_pages(vec![]).with_engine(Arc::new(StubOcr::local("Tab Pan 40")));
        let text = acquisition
            .extract_text(b"img", false, OcrProvider::Tesseract, None)
            .await
            .unwrap();
        assert_eq!(text, "Tab Pan 40");
    }

    #[tokio::test]
    async fn blank_ocr_text_is_no_text_detected() {
        let acquisition = with_pages(vec![]).with_engine(Arc::new(StubOcr::local("   ")));
        let err = acquisition
            .extract_text(b"img", false, OcrProvider::Tesseract, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NoTextDetected));
    }

    #[tokio::test]
    async fn unregistered_provider_is_unavailable() {
        let acquisition = with_pages(vec![]);
        assert!(!acquisition.has_engine(OcrProvider::Tesseract));
        let err = acquisition
            .extract_text(b"img", false, OcrProvider::Tesseract, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::ProviderUnavailable(OcrProvider::Tesseract)
        ));
    }

    #[tokio::test]
    async fn empty_upload_is_invalid_input() {
        let acquisition = with_pages(vec!["text"]);
        let err = acquisition
            .extract_text(b"", true, OcrProvider::GoogleVision, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidInput(_)));
    }
}
