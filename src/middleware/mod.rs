//! Request middleware and extractors.
//!
//! - [`auth`]: Bearer token authentication and the [`auth::CurrentUser`] extractor
//! - [`rbac`]: Per-route permission check against the static permission table
//!
//! # Request Flow
//!
//! 1. `authenticate` validates the bearer token, checks that its id has not been
//!    revoked and stores the user in the request extensions
//! 2. `authorize` resolves the caller's role and checks `<resource>.<action>` of
//!    the matched route against the permission table
//! 3. The handler runs and may extract [`auth::CurrentUser`]
//!
//! ```ignore
//! Router::new()
//!     .route("/abouts", guarded(&state, "abouts.index", get(index::<About>)))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

pub mod auth;
pub mod rbac;
