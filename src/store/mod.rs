//! Persistence behind the services.
//!
//! Services depend on the [`Store`] trait object held in `AppState`; two backends
//! implement it:
//!
//! - [`postgres::PostgresStore`]: the durable backend used by the server and CLI
//! - [`memory::MemoryStore`]: process-local state for tests and local development

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use sitekit_core::AppError;

use crate::modules::email_verification::model::EmailVerificationCode;
use crate::modules::resources::model::{Attributes, ResourceKind, ResourceRecord};
use crate::modules::users::model::{NewUser, User, UserChanges};

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => AppError::NotFound(message),
            StoreError::Conflict(message) => AppError::Conflict(message),
            StoreError::Unexpected(err) => AppError::Internal(err),
        }
    }
}

/// A page of results plus the total number of matching rows.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// `LIMIT` / `OFFSET` of a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

/// Attribute equality filters plus an optional window. Results are ordered by id.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filters: Attributes,
    pub window: Option<Window>,
}

pub(crate) fn record_not_found(kind: ResourceKind, id: i64) -> StoreError {
    StoreError::NotFound(format!("{} {} not found", kind.label(), id))
}

pub(crate) fn user_not_found(id: i64) -> StoreError {
    StoreError::NotFound(format!("User {} not found", id))
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn list_resources(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
    ) -> StoreResult<Listing<ResourceRecord>>;
    async fn get_resource(&self, kind: ResourceKind, id: i64) -> StoreResult<ResourceRecord>;
    async fn create_resource(
        &self,
        kind: ResourceKind,
        attributes: Attributes,
    ) -> StoreResult<ResourceRecord>;
    /// Replaces the attributes of a record and refreshes `updated_at`.
    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: i64,
        attributes: Attributes,
    ) -> StoreResult<ResourceRecord>;
    /// Removes a record and returns it as it was.
    async fn delete_resource(&self, kind: ResourceKind, id: i64) -> StoreResult<ResourceRecord>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self, window: Option<Window>) -> StoreResult<Listing<User>>;
    async fn get_user(&self, id: i64) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    /// Applies the set fields. A new role deactivates every earlier role record.
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User>;
    async fn delete_user(&self, id: i64) -> StoreResult<User>;
}

#[async_trait]
pub trait AccessTokenStore: Send + Sync {
    async fn register_token(&self, user_id: i64, token_id: Uuid) -> StoreResult<()>;
    async fn token_is_active(&self, user_id: i64, token_id: Uuid) -> StoreResult<bool>;
    async fn revoke_token(&self, token_id: Uuid) -> StoreResult<()>;
    /// Returns the number of revoked tokens.
    async fn revoke_user_tokens(&self, user_id: i64) -> StoreResult<u64>;
}

#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    async fn create_code(&self, email: &str, code_hash: &str)
    -> StoreResult<EmailVerificationCode>;
    /// Most recently created code for `email`.
    async fn latest_code(&self, email: &str) -> StoreResult<Option<EmailVerificationCode>>;
}

/// Everything the API persists.
pub trait Store: ResourceStore + UserStore + AccessTokenStore + VerificationCodeStore {
    fn backend_name(&self) -> &'static str;
}
