//! Prescription analysis endpoint.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::endpoints::upload::read_form;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::OcrProvider;
use crate::pipeline::structuring::PrescriptionRecord;

/// `POST /api/analyze-prescription` — multipart `{file, ocrProvider?, apiKey?}`.
///
/// Extracts text from the upload, then structures it with the language
/// model. Empty extraction is a 400; everything else that fails is a 500.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<PrescriptionRecord>, ApiError> {
    let form = read_form(multipart, "file").await?;
    let file = form
        .file
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;

    let provider: OcrProvider = form.field("ocrProvider").unwrap_or_default().parse()?;
    let is_pdf = file.is_pdf();

    tracing::info!(
        bytes = file.bytes.len(),
        is_pdf,
        %provider,
        "Analyzing prescription"
    );

    let text = ctx
        .text
        .extract_text(&file.bytes, is_pdf, provider, form.field("apiKey"))
        .await?;
    let record = ctx.prescriptions.extract(&text).await?;

    Ok(Json(record))
}
