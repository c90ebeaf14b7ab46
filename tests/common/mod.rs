#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use sitekit::modules::auth::service::AuthService;
use sitekit::modules::users::model::{NewUser, User};
use sitekit::router::init_router;
use sitekit::state::AppState;
use sitekit::store::UserStore;
use sitekit::store::memory::MemoryStore;
use sitekit::utils::email::testing::RecordingMailer;
use sitekit_config::{CorsConfig, JwtConfig, RbacConfig, SecurityConfig};
use sitekit_core::PermissionTable;
use sitekit_core::file_storage::LocalFileStorage;
use sitekit_core::password::{MIN_COST, hash_password};

pub const PASSWORD: &str = "secret1";
pub const MAX_UPLOAD_BYTES: usize = 8 * 1024;

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub upload_dir: PathBuf,
}

/// The bundled permission table plus a read-only `editor` entry for abouts.
pub fn test_permissions() -> PermissionTable {
    RbacConfig::default()
        .load()
        .unwrap()
        .grant("editor", "abouts", ["index", "show"])
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_permissions())
}

pub fn setup_test_app_with(permissions: PermissionTable) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let upload_dir = std::env::temp_dir().join(format!("sitekit-test-{}", Uuid::new_v4()));

    let state = AppState {
        store: store.clone(),
        permissions: Arc::new(permissions),
        mailer: mailer.clone(),
        file_storage: Arc::new(LocalFileStorage::with_max_size(
            &upload_dir,
            "uploads",
            MAX_UPLOAD_BYTES,
        )),
        jwt_config: JwtConfig::new("integration-test-secret", 3600),
        security_config: SecurityConfig {
            bcrypt_cost: MIN_COST,
        },
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    };

    TestApp {
        state,
        store,
        mailer,
        upload_dir,
    }
}

impl TestApp {
    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    pub async fn create_user(&self, email: &str, role: Option<&str>) -> User {
        self.store
            .create_user(NewUser {
                email: email.to_string(),
                name: "Test".to_string(),
                surename: "User".to_string(),
                password_hash: hash_password(PASSWORD, MIN_COST).unwrap(),
                email_verified_at: None,
                role: role.map(str::to_string),
            })
            .await
            .unwrap()
    }

    pub async fn token_for(&self, user: User) -> String {
        AuthService::issue_session(self.store.as_ref(), user, &self.state.jwt_config)
            .await
            .unwrap()
            .token
    }

    /// A fresh user holding `role` (or none) and a registered token for it.
    pub async fn login_as(&self, role: Option<&str>) -> String {
        let user = self.create_user(&unique_email(), role).await;
        self.token_for(user).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(self.router(), request).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub fn unique_email() -> String {
    format!("test-{}@test.uz", Uuid::new_v4())
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    json_request("GET", uri, token, None)
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
