pub mod types;
pub mod pdf;
pub mod vision;
pub mod ocr;
pub mod acquire;

pub use types::*;
pub use pdf::*;
pub use vision::*;
pub use ocr::*;
pub use acquire::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("No text could be extracted from the PDF. It may be scanned or contain only images.")]
    NoExtractableText,

    #[error("No text detected in the image. Please ensure the image is clear and contains readable text.")]
    NoTextDetected,

    #[error("API key for OCR provider '{0}' is not configured")]
    MissingCredential(OcrProvider),

    #[error("Unsupported OCR provider: {0}")]
    UnsupportedProvider(String),

    #[error("OCR provider '{0}' is not available in this build")]
    ProviderUnavailable(OcrProvider),

    #[error("OCR request failed: {0}")]
    Upstream(String),

    #[error("OCR provider returned error (status {status}): {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("Background task failed: {0}")]
    Task(String),
}
