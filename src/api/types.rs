//! Shared types for the API layer.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::drugs::{DrugLookup, DrugRegistry, DrugSummarizer, OpenFdaClient};
use crate::pipeline::extraction::{GoogleVisionOcr, PdfTextExtractor, TextAcquisition};
use crate::pipeline::structuring::{GeminiClient, LlmClient, PrescriptionExtractor};
use crate::stores::StoreDirectory;
use crate::StartupError;

/// Default cross-origin allow-list when none is configured.
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
/// Default request body ceiling for uploads (20 MB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
/// Every service is constructed once and is safe to share across requests.
#[derive(Clone)]
pub struct ApiContext {
    pub stores: Arc<StoreDirectory>,
    pub drugs: Arc<DrugLookup>,
    pub registry: Arc<dyn DrugRegistry>,
    pub text: Arc<TextAcquisition>,
    pub prescriptions: Arc<PrescriptionExtractor>,
}

impl ApiContext {
    /// Wire the services together. The language model is shared by the
    /// drug summary fallback and the prescription extractor.
    pub fn new(
        stores: StoreDirectory,
        registry: Arc<dyn DrugRegistry>,
        llm: Arc<dyn LlmClient>,
        text: TextAcquisition,
    ) -> Self {
        let drugs = DrugLookup::new(registry.clone(), DrugSummarizer::new(llm.clone()));
        Self {
            stores: Arc::new(stores),
            drugs: Arc::new(drugs),
            registry,
            text: Arc::new(text),
            prescriptions: Arc::new(PrescriptionExtractor::new(llm)),
        }
    }

    /// Build the production services from configuration.
    pub fn from_config(config: &AppConfig, stores: StoreDirectory) -> Result<Self, StartupError> {
        let registry = OpenFdaClient::new(&config.openfda_base_url, config.registry_timeout)?;
        let llm = GeminiClient::new(
            &config.gemini_base_url,
            &config.gemini_model,
            config.google_api_key.clone(),
            config.llm_timeout,
        )?;
        let vision = GoogleVisionOcr::new(&config.vision_base_url, config.ocr_timeout)?;

        let text = TextAcquisition::new(Arc::new(PdfTextExtractor), config.google_api_key.clone())
            .with_engine(Arc::new(vision));
        #[cfg(feature = "ocr")]
        let text = text.with_engine(Arc::new(
            crate::pipeline::extraction::TesseractOcr::new(config.tessdata_dir.clone())
                .with_languages(&config.ocr_languages),
        ));

        Ok(Self::new(stores, Arc::new(registry), Arc::new(llm), text))
    }
}

// ═══════════════════════════════════════════════════════════
// HTTP settings — router-level layers
// ═══════════════════════════════════════════════════════════

/// Settings applied as router layers rather than per handler.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl HttpSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cors_origins: config.cors_origins.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Uploaded file — parsed from a multipart form
// ═══════════════════════════════════════════════════════════

/// One file part of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// PDF when the part says `application/pdf`, or, lacking a content
    /// type, when the file name ends in `.pdf`.
    pub fn is_pdf(&self) -> bool {
        match self.content_type.as_deref() {
            Some(ct) if !ct.trim().is_empty() => {
                ct.trim().eq_ignore_ascii_case("application/pdf")
            }
            _ => self.has_pdf_extension(),
        }
    }

    pub fn has_pdf_extension(&self) -> bool {
        self.file_name
            .as_deref()
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: Option<&str>, content_type: Option<&str>) -> UploadedFile {
        UploadedFile {
            file_name: file_name.map(String::from),
            content_type: content_type.map(String::from),
            bytes: vec![1],
        }
    }

    #[test]
    fn pdf_detected_by_content_type() {
        assert!(upload(Some("scan.jpg"), Some("application/pdf")).is_pdf());
        assert!(!upload(Some("rx.pdf"), Some("image/jpeg")).is_pdf());
    }

    #[test]
    fn pdf_detected_by_extension_without_content_type() {
        assert!(upload(Some("RX.PDF"), None).is_pdf());
        assert!(!upload(Some("rx.png"), None).is_pdf());
        assert!(!upload(None, None).is_pdf());
    }

    #[test]
    fn default_http_settings() {
        let settings = HttpSettings::default();
        assert_eq!(settings.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(settings.max_upload_bytes, 20 * 1024 * 1024);
    }
}
