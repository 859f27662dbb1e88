use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// OCR provider selectable per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OcrProvider {
    #[default]
    #[serde(rename = "google-vision")]
    GoogleVision,
    #[serde(rename = "tesseract")]
    Tesseract,
}

impl OcrProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleVision => "google-vision",
            Self::Tesseract => "tesseract",
        }
    }
}

impl fmt::Display for OcrProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OcrProvider {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "google-vision" | "google" => Ok(Self::GoogleVision),
            "tesseract" => Ok(Self::Tesseract),
            other => Err(ExtractionError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Text of a single PDF page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageExtraction {
    pub page_number: usize,
    pub text: String,
}

/// OCR engine abstraction (allows mocking for tests)
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn provider(&self) -> OcrProvider;

    /// Whether `recognize` needs an API key.
    fn requires_credential(&self) -> bool;

    /// Recognize text in an encoded image (PNG, JPEG...). Returns the raw
    /// text, which may be blank.
    async fn recognize(
        &self,
        image_bytes: &[u8],
        api_key: Option<&str>,
    ) -> Result<String, ExtractionError>;
}

/// PDF text extraction abstraction
pub trait PdfExtractor: Send + Sync {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError>;
}
