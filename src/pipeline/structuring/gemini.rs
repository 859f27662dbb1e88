use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::StructuringError;

/// Upstream error bodies are cut to this many characters before they are
/// surfaced in error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Gemini `generateContent` client.
///
/// The API key travels in the `x-goog-api-key` header so it never appears
/// in URLs, logs or error messages.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StructuringError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StructuringError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response body from `generateContent`
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, StructuringError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(StructuringError::MissingCredential)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StructuringError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    StructuringError::HttpClient(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(StructuringError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| StructuringError::InvalidModelResponse(e.without_url().to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        tracing::debug!(
            model = %self.model,
            elapsed_ms = %start.elapsed().as_millis(),
            reply_len = text.len(),
            "Gemini generation complete"
        );

        if text.trim().is_empty() {
            return Err(StructuringError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Mock LLM client for testing: returns a canned reply (or fails) and
/// records every prompt it receives.
#[cfg(test)]
pub struct MockLlmClient {
    reply: Option<String>,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockLlmClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A client whose every call fails at transport level.
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for MockLlmClient {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, StructuringError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| StructuringError::HttpClient("mock model offline".into()))
    }
}
