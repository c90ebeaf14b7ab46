use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use tracing::instrument;

use sitekit_core::AppError;

use crate::modules::uploads::model::{UploadForm, UploadedFile};
use crate::modules::uploads::service::{FILE_FIELD, UploadService, too_large};
use crate::state::AppState;
use crate::utils::response::ErrorResponse;

fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_bytes)
    } else {
        AppError::bad_request(err.body_text())
    }
}

/// Store an image or document and return its public location
#[utoipa::path(
    post,
    path = "/api/upload-file",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadedFile),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 405, description = "Role lacks upload-image.index", body = ErrorResponse),
        (status = 422, description = "Missing or oversized file", body = ErrorResponse)
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedFile>, AppError> {
    let max_bytes = state.file_storage.max_file_size();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;

        let uploaded =
            UploadService::store_file(state.file_storage.as_ref(), file_name.as_deref(), &content)
                .await?;
        return Ok(Json(uploaded));
    }

    Err(AppError::invalid_field(
        FILE_FIELD,
        "The file field is required.",
    ))
}
