pub mod types;
pub mod prompt;
pub mod parser;
pub mod gemini;
pub mod extractor;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use gemini::*;
pub use extractor::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("Language model API key is not configured")]
    MissingCredential,

    #[error("Language model request failed: {0}")]
    HttpClient(String),

    #[error("Language model returned error (status {status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Empty response from language model")]
    EmptyResponse,

    #[error("Invalid language model response: {0}")]
    InvalidModelResponse(String),
}
