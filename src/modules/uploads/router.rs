use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::middleware::rbac::guarded;
use crate::state::AppState;

use super::controller::upload;

pub const ROUTE_NAME: &str = "upload-image.index";

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn init_uploads_router(state: &AppState) -> Router<AppState> {
    let body_limit = state.file_storage.max_file_size() + MULTIPART_OVERHEAD;

    Router::new().route(
        "/upload-file",
        guarded(state, ROUTE_NAME, post(upload)).layer(DefaultBodyLimit::max(body_limit)),
    )
}
