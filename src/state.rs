use std::sync::Arc;

use sitekit_config::{
    CorsConfig, EmailConfig, JwtConfig, RbacConfig, SecurityConfig, UploadConfig,
};
use sitekit_core::PermissionTable;
use sitekit_core::file_storage::FileStorage;

use crate::store::Store;
use crate::store::postgres;
use crate::utils::email::{Mailer, mailer_from_config};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub permissions: Arc<PermissionTable>,
    pub mailer: Arc<dyn Mailer>,
    pub file_storage: Arc<dyn FileStorage>,
    pub jwt_config: JwtConfig,
    pub security_config: SecurityConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .field("jwt_config", &"..")
            .field("security_config", &self.security_config)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let store = postgres::connect().await?;
    let permissions = RbacConfig::from_env().load()?;
    let email_config = EmailConfig::from_env();

    Ok(AppState {
        store: Arc::new(store),
        permissions: Arc::new(permissions),
        mailer: mailer_from_config(&email_config),
        file_storage: Arc::new(UploadConfig::from_env().storage()),
        jwt_config: JwtConfig::from_env(),
        security_config: SecurityConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    })
}
