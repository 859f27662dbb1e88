//! Multipart form reading shared by the upload endpoints.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::api::error::ApiError;
use crate::api::types::UploadedFile;

/// A parsed upload form: at most one file part plus text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Text field value, with blank values treated as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Read every part of `multipart`. The part named `file_field` is kept as
/// bytes; all other parts are read as text.
pub async fn read_form(mut multipart: Multipart, file_field: &str) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        if name == file_field {
            let file_name = field.file_name().map(String::from);
            let content_type = field.content_type().map(String::from);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            form.file = Some(UploadedFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(format!("Invalid multipart form: {}", err.body_text()))
    }
}
