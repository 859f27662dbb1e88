//! Google Cloud Vision OCR over its REST endpoint (`images:annotate`).

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::types::{OcrEngine, OcrProvider};
use super::ExtractionError;

/// Upstream error bodies are cut to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct GoogleVisionOcr {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl GoogleVisionOcr {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::Upstream(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [ImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 1],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<ResponseStatus>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct ResponseStatus {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl OcrEngine for GoogleVisionOcr {
    fn provider(&self) -> OcrProvider {
        OcrProvider::GoogleVision
    }

    fn requires_credential(&self) -> bool {
        true
    }

    async fn recognize(
        &self,
        image_bytes: &[u8],
        api_key: Option<&str>,
    ) -> Result<String, ExtractionError> {
        let api_key = api_key.ok_or(ExtractionError::MissingCredential(self.provider()))?;

        let body = AnnotateRequest {
            requests: [ImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image_bytes),
                },
                features: [Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(format!("{}/v1/images:annotate", self.base_url))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Upstream(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    ExtractionError::Upstream(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(ExtractionError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Upstream(e.without_url().to_string()))?;

        let text = annotation_text(parsed)?;
        tracing::debug!(
            elapsed_ms = %start.elapsed().as_millis(),
            text_len = text.len(),
            "Vision OCR complete"
        );
        Ok(text)
    }
}

/// The first annotation carries the full detected text.
fn annotation_text(parsed: AnnotateResponse) -> Result<String, ExtractionError> {
    let Some(first) = parsed.responses.into_iter().next() else {
        return Ok(String::new());
    };
    if let Some(error) = first.error.filter(|e| !e.message.is_empty()) {
        return Err(ExtractionError::Upstream(format!(
            "Google Cloud Vision API error: {}",
            error.message
        )));
    }
    Ok(first
        .text_annotations
        .into_iter()
        .next()
        .map(|a| a.description)
        .unwrap_or_default())
}
