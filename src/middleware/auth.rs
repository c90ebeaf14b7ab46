use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use sitekit_auth::verify_token;
use sitekit_core::{AppError, Role};

use crate::modules::users::model::User;
use crate::state::AppState;
use crate::store::{AccessTokenStore, StoreError, UserStore};

pub const UNAUTHENTICATED: &str = "Unauthenticated.";

/// The authenticated caller, placed in the request extensions by [`authenticate`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token_id: Uuid,
}

impl CurrentUser {
    pub fn role(&self) -> Role {
        Role::from_active(self.user.active_role_code())
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED))
}

/// Rejects the request with 401 unless it carries a valid, unrevoked token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = verify_token(bearer_token(req.headers())?, &state.jwt_config)?;
    let user_id = claims.user_id()?;
    let token_id = claims.token_id()?;

    if !state.store().token_is_active(user_id, token_id).await? {
        tracing::debug!(user_id, %token_id, "Rejected revoked token");
        return Err(AppError::unauthorized(UNAUTHENTICATED));
    }

    let user = state
        .store()
        .get_user(user_id)
        .await
        .map_err(|err| match err {
            StoreError::NotFound(_) => AppError::unauthorized(UNAUTHENTICATED),
            other => other.into(),
        })?;

    req.extensions_mut().insert(CurrentUser { user, token_id });
    Ok(next.run(req).await)
}
