use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use sitekit_core::AppError;

use super::model::{AuthSession, LoginRequest, RegisterRequest, ResetPasswordRequest};
use super::service::AuthService;
use crate::middleware::auth::CurrentUser;
use crate::modules::users::model::User;
use crate::state::AppState;
use crate::utils::response::{Data, ErrorResponse, MessageResponse};
use crate::validator::ValidatedJson;

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Data<AuthSession>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<Data<AuthSession>>, AppError> {
    let session = AuthService::login(state.store(), dto, &state.jwt_config).await?;
    Ok(Json(Data::new(session)))
}

/// Create an account with a mailed verification code
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Data<AuthSession>),
        (status = 401, description = "The provided code is incorrect.", body = ErrorResponse),
        (status = 422, description = "Validation failed or email taken", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Data<AuthSession>>), AppError> {
    let session = AuthService::register(
        state.store(),
        dto,
        &state.jwt_config,
        state.security_config.bcrypt_cost,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Data::new(session))))
}

/// Set a new password with a mailed verification code
#[utoipa::path(
    post,
    path = "/api/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced, existing tokens revoked", body = MessageResponse),
        (status = 401, description = "The provided code is incorrect.", body = ErrorResponse),
        (status = 404, description = "No user with this email", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::reset_password(state.store(), dto, state.security_config.bcrypt_cost).await?;
    Ok(Json(MessageResponse::new("Password has been reset.")))
}

/// Revoke the presented token
#[utoipa::path(
    get,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current), fields(user_id = current.user.id))]
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::logout(state.store(), current.token_id).await?;
    Ok(Json(MessageResponse::new("Logged out.")))
}

/// Return the user the token belongs to
#[utoipa::path(
    get,
    path = "/api/check-user-token",
    responses(
        (status = 200, description = "Current user", body = Data<User>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn check_user_token(current: CurrentUser) -> Json<Data<User>> {
    Json(Data::new(current.user))
}

/// Fallback target for clients that lost their session
#[utoipa::path(
    get,
    path = "/api/token-status",
    responses((status = 200, description = "Always `not authorized`", body = String)),
    tag = "Authentication"
)]
pub async fn token_status() -> &'static str {
    "not authorized"
}
