use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{check_email_verification, send_email_verification};

pub fn init_email_verification_router() -> Router<AppState> {
    Router::new()
        .route("/email-verification", post(send_email_verification))
        .route("/check-email-verification", post(check_email_verification))
}
