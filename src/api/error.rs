//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::drugs::{DrugLookupError, RegistryError};
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::structuring::StructuringError;
use crate::stores::StoreError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::PayloadTooLarge(detail) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", detail)
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", detail)
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound("Store not found".into()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<DrugLookupError> for ApiError {
    fn from(err: DrugLookupError) -> Self {
        match err {
            DrugLookupError::EmptyName => ApiError::BadRequest(err.to_string()),
            DrugLookupError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DrugLookupError::LookupFailed(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<StructuringError> for ApiError {
    fn from(err: StructuringError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidInput(_)
            | ExtractionError::NoExtractableText
            | ExtractionError::NoTextDetected
            | ExtractionError::UnsupportedProvider(_) => ApiError::BadRequest(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::OcrProvider;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Store not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Store not found");
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("File must be a PDF".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn payload_too_large_returns_413() {
        let response = ApiError::PayloadTooLarge("limit".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn internal_returns_500_with_upstream_message() {
        let response = ApiError::Internal("OCR request failed: timed out".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INTERNAL");
        assert_eq!(json["error"]["message"], "OCR request failed: timed out");
    }

    #[test]
    fn empty_text_errors_map_to_bad_request() {
        assert!(matches!(
            ApiError::from(ExtractionError::NoExtractableText),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(ExtractionError::NoTextDetected),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn missing_credential_maps_to_internal() {
        let err = ApiError::from(ExtractionError::MissingCredential(OcrProvider::GoogleVision));
        assert!(matches!(err, ApiError::Internal(ref m) if m.contains("google-vision")));
        assert!(matches!(
            ApiError::from(StructuringError::MissingCredential),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn drug_lookup_errors_map_by_class() {
        assert!(matches!(
            ApiError::from(DrugLookupError::NotFound("x".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(DrugLookupError::LookupFailed("x".into())),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(DrugLookupError::EmptyName),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err = ApiError::from(StoreError::NotFound("PMBJK00999".into()));
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Store not found"));
    }
}
