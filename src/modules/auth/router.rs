use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{check_user_token, login, logout, register, reset_password, token_status};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/reset-password", post(reset_password))
        .route("/token-status", get(token_status))
}

/// Routes that need a valid token but no permission entry.
pub fn init_session_router() -> Router<AppState> {
    Router::new()
        .route("/logout", get(logout))
        .route("/check-user-token", get(check_user_token))
}
