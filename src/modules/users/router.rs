use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::rbac::guarded;
use crate::state::AppState;

use super::controller::{destroy, index, roles, show, store, update};

pub const ROUTE_NAMES: [&str; 6] = [
    "user.index",
    "user.store",
    "user.show",
    "user.update",
    "user.destroy",
    "user.roles",
];

pub fn init_users_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/user",
            guarded(state, "user.index", get(index))
                .merge(guarded(state, "user.store", post(store))),
        )
        .route(
            "/user/{id}",
            guarded(state, "user.show", get(show))
                .merge(guarded(state, "user.update", put(update).patch(update)))
                .merge(guarded(state, "user.destroy", delete(destroy))),
        )
        .route("/role", guarded(state, "user.roles", get(roles)))
}
