use anyhow::Context;
use dotenvy::dotenv;

use sitekit::logging::init_tracing;
use sitekit::router::{init_router, warn_unknown_permissions};
use sitekit::state::init_app_state;
use sitekit_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server_config = ServerConfig::from_env();
    let state = init_app_state().await?;
    warn_unknown_permissions(&state);

    tracing::info!(store = state.store.backend_name(), "Application state ready");

    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {}", address))?;

    tracing::info!("🚀 Server running on http://{}", address);
    tracing::info!("📖 Scalar UI available at http://{}/scalar", address);
    axum::serve(listener, app).await?;

    Ok(())
}
