use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::storage::upload_extension;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::upload::UploadResponse;
use crate::state::AppState;

/// Multipart overhead allowed on top of the per-file limit.
const MULTIPART_SLACK: u64 = 64 * 1024;

/// Body limit for the upload route. Several files may share one request.
pub fn upload_body_limit(max_file_size: u64) -> DefaultBodyLimit {
    let limit = max_file_size.saturating_mul(8).saturating_add(MULTIPART_SLACK);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    tag = "Uploads",
    operation_id = "uploadImages",
    summary = "Upload images",
    description = "Stages one or more images (`file` or `files` multipart fields). \
        Files are named by content hash under a dated staging directory, so repeating an upload on the same day returns the same reference. \
        The returned references are used in submissions and become canonical once approved.",
    request_body(content_type = "multipart/form-data", description = "One or more image files"),
    responses(
        (status = 201, description = "Files staged", body = UploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_size = state.config.storage.max_upload_size;
    let today = Utc::now().date_naive();
    let mut files = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if !matches!(field.name(), Some("file") | Some("files")) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !is_image(field.content_type(), &file_name) {
            return Err(AppError::Validation(format!(
                "'{file_name}' is not an image"
            )));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            if (data.len() + chunk.len()) as u64 > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File exceeds maximum size of {max_size} bytes"
                )));
            }
            data.extend_from_slice(&chunk);
        }
        if data.is_empty() {
            return Err(AppError::Validation(format!("'{file_name}' is empty")));
        }

        let extension = upload_extension(&file_name);
        let staged = state
            .assets
            .stage(&data, extension.as_deref(), today)
            .await?;
        tracing::info!(reference = %staged, size = data.len(), "Staged upload");
        files.push(staged.to_string());
    }

    if files.is_empty() {
        return Err(AppError::Validation("Missing 'file' field".into()));
    }

    Ok((StatusCode::CREATED, Json(UploadResponse { files })))
}

/// Accept by declared content type, falling back to the filename.
fn is_image(content_type: Option<&str>, file_name: &str) -> bool {
    match content_type {
        Some(ct) if ct != "application/octet-stream" => ct.starts_with("image/"),
        _ => mime_guess::from_path(file_name)
            .first()
            .is_some_and(|m| m.type_() == mime_guess::mime::IMAGE),
    }
}
