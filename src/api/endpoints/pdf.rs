//! PDF text extraction endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::api::endpoints::upload::read_form;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::ExtractionError;

/// Maximum PDF size accepted by `/api/extract-text` (5 MB).
pub const MAX_PDF_BYTES: usize = 5 * 1024 * 1024;

#[derive(Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

/// `POST /api/extract-text` — multipart `{pdf}`, text layer only.
pub async fn extract_text(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<ExtractTextResponse>, ApiError> {
    let form = read_form(multipart, "pdf").await.map_err(|e| match e {
        ApiError::PayloadTooLarge(_) => oversized(),
        other => other,
    })?;
    let pdf = form
        .file
        .ok_or_else(|| ApiError::BadRequest("No PDF provided".into()))?;

    if !pdf.has_pdf_extension() {
        return Err(ApiError::BadRequest("File must be a PDF".into()));
    }
    if pdf.bytes.len() > MAX_PDF_BYTES {
        return Err(oversized());
    }

    let text = ctx
        .text
        .extract_pdf_text(&pdf.bytes)
        .await
        .map_err(|e| match e {
            ExtractionError::PdfParsing(detail) => {
                ApiError::BadRequest(format!("Invalid PDF file: {detail}"))
            }
            other => ApiError::from(other),
        })?;

    Ok(Json(ExtractTextResponse { text }))
}

fn oversized() -> ApiError {
    ApiError::BadRequest("File size must be less than 5MB".into())
}
