//! In-memory implementation of [`Store`].
//!
//! State lives in one `tokio::sync::RwLock`-guarded struct and is lost on restart.
//! Ids are assigned from per-table counters starting at 1, so insertion order and
//! id order agree just like with `BIGSERIAL` columns.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AccessTokenStore, ListQuery, Listing, ResourceStore, Store, StoreError, StoreResult,
    UserStore, VerificationCodeStore, Window, record_not_found, user_not_found,
};
use crate::modules::email_verification::model::EmailVerificationCode;
use crate::modules::resources::model::{Attributes, ResourceKind, ResourceRecord};
use crate::modules::users::model::{NewUser, RoleStatus, User, UserChanges, UserRole};

#[derive(Debug, Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug)]
struct AccessToken {
    user_id: i64,
    token_id: Uuid,
}

#[derive(Debug, Default)]
struct MemoryState {
    resources: HashMap<ResourceKind, BTreeMap<i64, ResourceRecord>>,
    resource_ids: HashMap<ResourceKind, Sequence>,
    users: BTreeMap<i64, User>,
    user_ids: Sequence,
    role_ids: Sequence,
    tokens: Vec<AccessToken>,
    codes: Vec<EmailVerificationCode>,
    code_ids: Sequence,
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }

    fn push_role(&mut self, user_id: i64, role_code: String) -> UserRole {
        UserRole {
            id: self.role_ids.next(),
            user_id,
            role_code,
            status: RoleStatus::Active,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filters(record: &ResourceRecord, filters: &Attributes) -> bool {
    filters
        .iter()
        .all(|(key, expected)| record.attributes.get(key) == Some(expected))
}

fn apply_window<T>(items: Vec<T>, window: Option<Window>) -> Vec<T> {
    match window {
        Some(window) => items
            .into_iter()
            .skip(window.offset.max(0) as usize)
            .take(window.limit.max(0) as usize)
            .collect(),
        None => items,
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_resources(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
    ) -> StoreResult<Listing<ResourceRecord>> {
        let state = self.state.read().await;
        let matching: Vec<ResourceRecord> = state
            .resources
            .get(&kind)
            .map(|records| {
                records
                    .values()
                    .filter(|record| matches_filters(record, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let total = matching.len() as i64;
        Ok(Listing {
            items: apply_window(matching, query.window),
            total,
        })
    }

    async fn get_resource(&self, kind: ResourceKind, id: i64) -> StoreResult<ResourceRecord> {
        let state = self.state.read().await;
        state
            .resources
            .get(&kind)
            .and_then(|records| records.get(&id))
            .cloned()
            .ok_or_else(|| record_not_found(kind, id))
    }

    async fn create_resource(
        &self,
        kind: ResourceKind,
        attributes: Attributes,
    ) -> StoreResult<ResourceRecord> {
        let mut state = self.state.write().await;
        let id = state.resource_ids.entry(kind).or_default().next();
        let now = Utc::now();
        let record = ResourceRecord {
            id,
            attributes,
            created_at: now,
            updated_at: now,
        };
        state
            .resources
            .entry(kind)
            .or_default()
            .insert(id, record.clone());
        Ok(record)
    }

    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: i64,
        attributes: Attributes,
    ) -> StoreResult<ResourceRecord> {
        let mut state = self.state.write().await;
        let record = state
            .resources
            .get_mut(&kind)
            .and_then(|records| records.get_mut(&id))
            .ok_or_else(|| record_not_found(kind, id))?;
        record.attributes = attributes;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_resource(&self, kind: ResourceKind, id: i64) -> StoreResult<ResourceRecord> {
        let mut state = self.state.write().await;
        state
            .resources
            .get_mut(&kind)
            .and_then(|records| records.remove(&id))
            .ok_or_else(|| record_not_found(kind, id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self, window: Option<Window>) -> StoreResult<Listing<User>> {
        let state = self.state.read().await;
        let users: Vec<User> = state.users.values().cloned().collect();
        let total = users.len() as i64;
        Ok(Listing {
            items: apply_window(users, window),
            total,
        })
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        let state = self.state.read().await;
        state.users.get(&id).cloned().ok_or_else(|| user_not_found(id))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|user| user.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.email_taken(&user.email, None) {
            return Err(StoreError::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }

        let id = state.user_ids.next();
        let now = Utc::now();
        let roles = match user.role {
            Some(code) => vec![state.push_role(id, code)],
            None => Vec::new(),
        };
        let created = User {
            id,
            email: user.email,
            name: user.name,
            surename: user.surename,
            password: user.password_hash,
            email_verified_at: user.email_verified_at,
            created_at: now,
            updated_at: now,
            roles,
        };
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(user_not_found(id));
        }
        if let Some(email) = &changes.email
            && state.email_taken(email, Some(id))
        {
            return Err(StoreError::Conflict(format!(
                "User with email {} already exists",
                email
            )));
        }

        let new_role = changes.role.map(|code| state.push_role(id, code));
        let user = state.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(surename) = changes.surename {
            user.surename = surename;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password = password_hash;
        }
        if let Some(role) = new_role {
            for existing in &mut user.roles {
                existing.status = RoleStatus::Inactive;
            }
            user.roles.push(role);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> StoreResult<User> {
        let mut state = self.state.write().await;
        let user = state.users.remove(&id).ok_or_else(|| user_not_found(id))?;
        state.tokens.retain(|token| token.user_id != id);
        Ok(user)
    }
}

#[async_trait]
impl AccessTokenStore for MemoryStore {
    async fn register_token(&self, user_id: i64, token_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.tokens.push(AccessToken { user_id, token_id });
        Ok(())
    }

    async fn token_is_active(&self, user_id: i64, token_id: Uuid) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .iter()
            .any(|token| token.user_id == user_id && token.token_id == token_id))
    }

    async fn revoke_token(&self, token_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.tokens.retain(|token| token.token_id != token_id);
        Ok(())
    }

    async fn revoke_user_tokens(&self, user_id: i64) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let before = state.tokens.len();
        state.tokens.retain(|token| token.user_id != user_id);
        Ok((before - state.tokens.len()) as u64)
    }
}

#[async_trait]
impl VerificationCodeStore for MemoryStore {
    async fn create_code(
        &self,
        email: &str,
        code_hash: &str,
    ) -> StoreResult<EmailVerificationCode> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let code = EmailVerificationCode {
            id: state.code_ids.next(),
            email: email.to_string(),
            code: code_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.codes.push(code.clone());
        Ok(code)
    }

    async fn latest_code(&self, email: &str) -> StoreResult<Option<EmailVerificationCode>> {
        let state = self.state.read().await;
        Ok(state
            .codes
            .iter()
            .filter(|code| code.email == email)
            .max_by_key(|code| code.id)
            .cloned())
    }
}

impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
