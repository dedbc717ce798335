//! POST /api/convert — the conversion endpoint.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use fileforge_convert::validator::{ALLOWED_EXTENSIONS, ALLOWED_MIME_TYPES, validate_upload};
use fileforge_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Accepts a multipart form with a `file` part and an optional `target`
/// part, validates the upload, and dispatches it to the matching
/// converter.
///
/// Conversion failures are reported in-band: the response body is always
/// the canonical result shape, with a 500 status when `success` is false.
pub async fn convert_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut file_name: Option<String> = None;
    let mut declared_mime: Option<String> = None;
    let mut data: Option<Bytes> = None;
    let mut target: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(String::from);
                declared_mime = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "target" => {
                target = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let file_name = file_name.ok_or_else(|| AppError::validation("No file uploaded."))?;
    let data = data.ok_or_else(|| AppError::validation("No file uploaded."))?;

    let file = state
        .scratch
        .store_upload(&file_name, declared_mime.as_deref(), &data)
        .await?;

    if let Err(e) = validate_upload(
        &file.path,
        &file.original_name,
        ALLOWED_EXTENSIONS,
        ALLOWED_MIME_TYPES,
        state.config.scratch.max_upload_mb,
    )
    .await
    {
        tracing::warn!(
            original_name = %file.original_name,
            declared_mime = file.declared_mime.as_deref().unwrap_or("-"),
            error = %e,
            "Upload rejected"
        );
        // The rejected scratch file must not linger.
        state.scratch.schedule_unlink(file.path.clone());
        return Err(e.into());
    }

    let target = target.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let result = state.dispatcher.dispatch(file, target).await;

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(result)).into_response())
}
