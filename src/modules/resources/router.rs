use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::rbac::guarded;
use crate::modules::resources::controller::{destroy, index, show, store, update};
use crate::modules::resources::model::{
    About, Carousel, CompanyNew, Partner, Product, ResourceKind, ResourceSchema, Service,
    Setting, Translation,
};
use crate::state::AppState;

pub const ACTIONS: [&str; 5] = ["index", "store", "show", "update", "destroy"];

/// `<kind>.<action>` names of every guarded content route.
pub fn route_names() -> Vec<String> {
    ResourceKind::ALL
        .iter()
        .flat_map(|kind| {
            ACTIONS
                .iter()
                .map(move |action| format!("{}.{}", kind.name(), action))
        })
        .collect()
}

fn resource_routes<R: ResourceSchema>(state: &AppState) -> Router<AppState> {
    let name = R::KIND.name();
    let route = |action: &str| format!("{}.{}", name, action);

    Router::new()
        .route(
            &format!("/{}", name),
            guarded(state, route("index"), get(index::<R>))
                .merge(guarded(state, route("store"), post(store::<R>))),
        )
        .route(
            &format!("/{}/{{id}}", name),
            guarded(state, route("show"), get(show::<R>))
                .merge(guarded(
                    state,
                    route("update"),
                    put(update::<R>).patch(update::<R>),
                ))
                .merge(guarded(state, route("destroy"), axum::routing::delete(destroy::<R>))),
        )
}

fn public_routes<R: ResourceSchema>() -> Router<AppState> {
    let name = R::KIND.name();

    Router::new()
        .route(&format!("/ui/{}", name), get(index::<R>))
        .route(&format!("/ui/{}/{{id}}", name), get(show::<R>))
}

/// Authenticated, RBAC-guarded CRUD routes for every content kind.
pub fn init_resources_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<About>(state))
        .merge(resource_routes::<Carousel>(state))
        .merge(resource_routes::<CompanyNew>(state))
        .merge(resource_routes::<Partner>(state))
        .merge(resource_routes::<Product>(state))
        .merge(resource_routes::<Service>(state))
        .merge(resource_routes::<Setting>(state))
        .merge(resource_routes::<Translation>(state))
}

/// Read-only `/ui/<kind>` mirror for the public website.
pub fn init_ui_router() -> Router<AppState> {
    Router::new()
        .merge(public_routes::<About>())
        .merge(public_routes::<Carousel>())
        .merge(public_routes::<CompanyNew>())
        .merge(public_routes::<Partner>())
        .merge(public_routes::<Product>())
        .merge(public_routes::<Service>())
        .merge(public_routes::<Setting>())
        .merge(public_routes::<Translation>())
}
