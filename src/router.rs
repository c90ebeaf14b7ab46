use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::auth::authenticate;
use crate::modules::auth::{init_auth_router, init_session_router};
use crate::modules::email_verification::init_email_verification_router;
use crate::modules::resources::{init_resources_router, init_ui_router, router as resources};
use crate::modules::uploads::{init_uploads_router, router as uploads};
use crate::modules::users::{init_users_router, router as users};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

/// Logical names of every RBAC-guarded route.
pub fn protected_route_names() -> Vec<String> {
    users::ROUTE_NAMES
        .iter()
        .map(|name| name.to_string())
        .chain(std::iter::once(uploads::ROUTE_NAME.to_string()))
        .chain(resources::route_names())
        .collect()
}

/// Logs permission entries that name no route. Never fatal.
pub fn warn_unknown_permissions(state: &AppState) -> Vec<String> {
    let names = protected_route_names();
    let unknown = state
        .permissions
        .unknown_entries(names.iter().map(String::as_str));

    for entry in &unknown {
        tracing::warn!(entry = %entry, "Permission entry names no route");
    }
    unknown
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(init_session_router())
        .merge(init_users_router(&state))
        .merge(init_uploads_router(&state))
        .merge(init_resources_router(&state))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let public = Router::new()
        .merge(init_auth_router())
        .merge(init_email_verification_router())
        .merge(init_ui_router());

    Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", public.merge(protected))
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
}
