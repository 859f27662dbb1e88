//! Local Tesseract OCR. Only compiled with the `ocr` feature flag.

#[cfg(feature = "ocr")]
use std::path::PathBuf;

#[cfg(feature = "ocr")]
use async_trait::async_trait;

#[cfg(feature = "ocr")]
use super::types::{OcrEngine, OcrProvider};
#[cfg(feature = "ocr")]
use super::ExtractionError;

/// Tesseract OCR engine. Runs on the blocking thread pool; needs no key.
#[cfg(feature = "ocr")]
pub struct TesseractOcr {
    tessdata_dir: Option<PathBuf>,
    lang: String,
}

#[cfg(feature = "ocr")]
impl TesseractOcr {
    /// `tessdata_dir` of `None` uses Tesseract's compiled-in default.
    pub fn new(tessdata_dir: Option<PathBuf>) -> Self {
        Self {
            tessdata_dir,
            lang: "eng".to_string(),
        }
    }

    /// Set language(s) for OCR (e.g., "eng", "eng+hin")
    pub fn with_languages(mut self, langs: &str) -> Self {
        self.lang = langs.to_string();
        self
    }
}

#[cfg(feature = "ocr")]
#[async_trait]
impl OcrEngine for TesseractOcr {
    fn provider(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    fn requires_credential(&self) -> bool {
        false
    }

    async fn recognize(
        &self,
        image_bytes: &[u8],
        _api_key: Option<&str>,
    ) -> Result<String, ExtractionError> {
        let tessdata = match &self.tessdata_dir {
            Some(dir) => Some(
                dir.to_str()
                    .ok_or_else(|| ExtractionError::OcrProcessing("Invalid tessdata path".into()))?
                    .to_string(),
            ),
            None => None,
        };
        let lang = self.lang.clone();
        let image = image_bytes.to_vec();

        tokio::task::spawn_blocking(move || -> Result<String, ExtractionError> {
            let tess = tesseract::Tesseract::new(tessdata.as_deref(), Some(&lang))
                .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;
            let mut tess = tess
                .set_image_from_mem(&image)
                .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;
            tess.get_text()
                .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))
        })
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}
