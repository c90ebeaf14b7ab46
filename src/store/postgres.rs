//! Postgres implementation of [`Store`].
//!
//! Content records live in one table per [`ResourceKind`] with a JSONB `attributes`
//! column; attribute filters are applied with JSONB containment (`@>`).

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use super::{
    AccessTokenStore, ListQuery, Listing, ResourceStore, Store, StoreError, StoreResult,
    UserStore, VerificationCodeStore, Window, record_not_found, user_not_found,
};
use crate::modules::email_verification::model::EmailVerificationCode;
use crate::modules::resources::model::{Attributes, ResourceKind, ResourceRecord};
use crate::modules::users::model::{NewUser, RoleStatus, User, UserChanges, UserRole};

const USER_COLUMNS: &str =
    "id, email, name, surename, password, email_verified_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn attach_roles(&self, mut users: Vec<User>) -> StoreResult<Vec<User>> {
        if users.is_empty() {
            return Ok(users);
        }

        let ids: Vec<i64> = users.iter().map(|user| user.id).collect();
        let roles = sqlx::query_as::<_, UserRole>(
            r#"SELECT id, user_id, role_code, status, created_at
               FROM user_roles
               WHERE user_id = ANY($1)
               ORDER BY id"#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut by_user: HashMap<i64, Vec<UserRole>> = HashMap::new();
        for role in roles {
            by_user.entry(role.user_id).or_default().push(role);
        }
        for user in &mut users {
            user.roles = by_user.remove(&user.id).unwrap_or_default();
        }

        Ok(users)
    }

    async fn attach_roles_one(&self, user: User) -> StoreResult<User> {
        let id = user.id;
        self.attach_roles(vec![user])
            .await?
            .pop()
            .ok_or_else(|| user_not_found(id))
    }
}

#[derive(Debug, FromRow)]
struct ResourceRow {
    id: i64,
    attributes: Json<Attributes>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResourceRow> for ResourceRecord {
    fn from(row: ResourceRow) -> Self {
        ResourceRecord {
            id: row.id,
            attributes: row.attributes.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn unexpected(err: sqlx::Error) -> StoreError {
    StoreError::Unexpected(anyhow::Error::new(err).context("database query failed"))
}

fn email_conflict(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(format!("User with email {} already exists", email));
    }
    unexpected(err)
}

async fn insert_active_role(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    role_code: &str,
) -> StoreResult<()> {
    sqlx::query("INSERT INTO user_roles (user_id, role_code, status) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(role_code)
        .bind(RoleStatus::Active)
        .execute(&mut **tx)
        .await
        .map_err(unexpected)?;
    Ok(())
}

#[async_trait]
impl ResourceStore for PostgresStore {
    #[instrument(skip(self))]
    async fn list_resources(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
    ) -> StoreResult<Listing<ResourceRecord>> {
        let table = kind.name();

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE attributes @> $1",
            table
        ))
        .bind(Json(&query.filters))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        let rows = match query.window {
            Some(Window { limit, offset }) => {
                sqlx::query_as::<_, ResourceRow>(&format!(
                    "SELECT id, attributes, created_at, updated_at FROM {} \
                     WHERE attributes @> $1 ORDER BY id LIMIT $2 OFFSET $3",
                    table
                ))
                .bind(Json(&query.filters))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ResourceRow>(&format!(
                    "SELECT id, attributes, created_at, updated_at FROM {} \
                     WHERE attributes @> $1 ORDER BY id",
                    table
                ))
                .bind(Json(&query.filters))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(unexpected)?;

        Ok(Listing {
            items: rows.into_iter().map(ResourceRecord::from).collect(),
            total,
        })
    }

    #[instrument(skip(self))]
    async fn get_resource(&self, kind: ResourceKind, id: i64) -> StoreResult<ResourceRecord> {
        sqlx::query_as::<_, ResourceRow>(&format!(
            "SELECT id, attributes, created_at, updated_at FROM {} WHERE id = $1",
            kind.name()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(ResourceRecord::from)
        .ok_or_else(|| record_not_found(kind, id))
    }

    #[instrument(skip(self, attributes))]
    async fn create_resource(
        &self,
        kind: ResourceKind,
        attributes: Attributes,
    ) -> StoreResult<ResourceRecord> {
        let row = sqlx::query_as::<_, ResourceRow>(&format!(
            "INSERT INTO {} (attributes) VALUES ($1) \
             RETURNING id, attributes, created_at, updated_at",
            kind.name()
        ))
        .bind(Json(&attributes))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(row.into())
    }

    #[instrument(skip(self, attributes))]
    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: i64,
        attributes: Attributes,
    ) -> StoreResult<ResourceRecord> {
        sqlx::query_as::<_, ResourceRow>(&format!(
            "UPDATE {} SET attributes = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING id, attributes, created_at, updated_at",
            kind.name()
        ))
        .bind(Json(&attributes))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(ResourceRecord::from)
        .ok_or_else(|| record_not_found(kind, id))
    }

    #[instrument(skip(self))]
    async fn delete_resource(&self, kind: ResourceKind, id: i64) -> StoreResult<ResourceRecord> {
        sqlx::query_as::<_, ResourceRow>(&format!(
            "DELETE FROM {} WHERE id = $1 RETURNING id, attributes, created_at, updated_at",
            kind.name()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(ResourceRecord::from)
        .ok_or_else(|| record_not_found(kind, id))
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip(self))]
    async fn list_users(&self, window: Option<Window>) -> StoreResult<Listing<User>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;

        let users = match window {
            Some(Window { limit, offset }) => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
                    USER_COLUMNS
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {} FROM users ORDER BY id",
                    USER_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(unexpected)?;

        Ok(Listing {
            items: self.attach_roles(users).await?,
            total,
        })
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| user_not_found(id))?;

        self.attach_roles_one(user).await
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        match user {
            Some(user) => Ok(Some(self.attach_roles_one(user).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, surename, password, email_verified_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.surename)
        .bind(&user.password_hash)
        .bind(user.email_verified_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| email_conflict(e, &user.email))?;

        if let Some(role) = &user.role {
            insert_active_role(&mut tx, created.id, role).await?;
        }

        tx.commit().await.map_err(unexpected)?;
        self.attach_roles_one(created).await
    }

    #[instrument(skip(self, changes))]
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                email = COALESCE($1, email), \
                name = COALESCE($2, name), \
                surename = COALESCE($3, surename), \
                password = COALESCE($4, password), \
                updated_at = NOW() \
             WHERE id = $5 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&changes.email)
        .bind(&changes.name)
        .bind(&changes.surename)
        .bind(&changes.password_hash)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| email_conflict(e, changes.email.as_deref().unwrap_or_default()))?
        .ok_or_else(|| user_not_found(id))?;

        if let Some(role) = &changes.role {
            sqlx::query("UPDATE user_roles SET status = $1 WHERE user_id = $2")
                .bind(RoleStatus::Inactive)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(unexpected)?;
            insert_active_role(&mut tx, id, role).await?;
        }

        tx.commit().await.map_err(unexpected)?;
        self.attach_roles_one(updated).await
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: i64) -> StoreResult<User> {
        let user = self.get_user(id).await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(user)
    }
}

#[async_trait]
impl AccessTokenStore for PostgresStore {
    async fn register_token(&self, user_id: i64, token_id: Uuid) -> StoreResult<()> {
        sqlx::query("INSERT INTO access_tokens (user_id, token_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(token_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn token_is_active(&self, user_id: i64, token_id: Uuid) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM access_tokens WHERE user_id = $1 AND token_id = $2)",
        )
        .bind(user_id)
        .bind(token_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)
    }

    async fn revoke_token(&self, token_id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM access_tokens WHERE token_id = $1")
            .bind(token_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn revoke_user_tokens(&self, user_id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl VerificationCodeStore for PostgresStore {
    #[instrument(skip(self, code_hash))]
    async fn create_code(
        &self,
        email: &str,
        code_hash: &str,
    ) -> StoreResult<EmailVerificationCode> {
        sqlx::query_as::<_, EmailVerificationCode>(
            r#"INSERT INTO email_verification_codes (email, code)
               VALUES ($1, $2)
               RETURNING id, email, code, created_at, updated_at"#,
        )
        .bind(email)
        .bind(code_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)
    }

    #[instrument(skip(self))]
    async fn latest_code(&self, email: &str) -> StoreResult<Option<EmailVerificationCode>> {
        sqlx::query_as::<_, EmailVerificationCode>(
            r#"SELECT id, email, code, created_at, updated_at
               FROM email_verification_codes
               WHERE email = $1
               ORDER BY id DESC
               LIMIT 1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)
    }
}

impl Store for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Connects using `DATABASE_URL` and applies pending migrations.
pub async fn connect() -> anyhow::Result<PostgresStore> {
    let pool = sitekit_db::init_db_pool().await?;
    sitekit_db::run_migrations(&pool)
        .await
        .context("preparing database schema")?;
    Ok(PostgresStore::new(pool))
}
