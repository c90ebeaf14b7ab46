//! Route-level RBAC.
//!
//! Every guarded route carries a [`RouteName`]. The caller's role is the active role
//! of the authenticated user, or `guest` when there is none; the request goes
//! through only if the permission table lists the route's action for that role.
//! Denials answer `405 {"message": "NOT ALLOWED"}`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use sitekit_core::{AppError, Role};

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Logical `<resource>.<action>` name of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteName(Arc<str>);

impl RouteName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Route name and role of a guarded request, left in the response extensions
/// for the request log.
#[derive(Debug, Clone)]
pub struct RouteAccess {
    pub route: RouteName,
    pub role: Role,
}

pub async fn authorize(
    State((state, route)): State<(AppState, RouteName)>,
    req: Request,
    next: Next,
) -> Response {
    let role = req
        .extensions()
        .get::<CurrentUser>()
        .map(CurrentUser::role)
        .unwrap_or_else(Role::guest);

    let mut response = match state.permissions.authorize(&role, route.as_str()) {
        Ok(()) => {
            tracing::debug!(role = %role, route = route.as_str(), "Permission granted");
            next.run(req).await
        }
        Err(denied) => {
            tracing::warn!(role = %role, route = route.as_str(), "Permission denied");
            AppError::from(denied).into_response()
        }
    };

    response.extensions_mut().insert(RouteAccess { route, role });
    response
}

/// Attaches the RBAC check for `name` to a method router.
pub fn guarded(
    state: &AppState,
    name: impl Into<Arc<str>>,
    method_router: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    method_router.route_layer(middleware::from_fn_with_state(
        (state.clone(), RouteName::new(name)),
        authorize,
    ))
}
