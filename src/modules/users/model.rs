//! User data models and DTOs.
//!
//! - [`User`]: account with its embedded role records
//! - [`UserRole`]: one role assignment, active or inactive
//! - [`CreateUserDto`] / [`UpdateUserDto`]: admin-side user management
//! - [`role_codes`]: the role codes known to the API

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Role codes a user can be assigned.
pub mod role_codes {
    use std::collections::BTreeMap;

    pub const SUPER_ADMIN: &str = "super_admin";
    pub const MODERATOR: &str = "moderator";
    pub const EDITOR: &str = "editor";
    pub const USER: &str = "user";

    pub const ALL: [&str; 4] = [SUPER_ADMIN, MODERATOR, EDITOR, USER];

    pub fn is_known(code: &str) -> bool {
        ALL.contains(&code)
    }

    /// Code → display label, as served by `GET /role`.
    pub fn labels() -> BTreeMap<&'static str, &'static str> {
        ALL.iter().map(|code| (*code, *code)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserRole {
    pub id: i64,
    pub user_id: i64,
    pub role_code: String,
    pub status: RoleStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub surename: String,
    #[serde(skip)]
    pub password: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub roles: Vec<UserRole>,
}

impl User {
    /// First active role record in insertion order.
    pub fn active_role(&self) -> Option<&UserRole> {
        self.roles
            .iter()
            .filter(|role| role.status == RoleStatus::Active)
            .min_by_key(|role| role.id)
    }

    pub fn active_role_code(&self) -> Option<&str> {
        self.active_role().map(|role| role.role_code.as_str())
    }
}

/// Insert payload for the user store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub surename: String,
    pub password_hash: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub role: Option<String>,
}

/// Partial update for the user store. `role` replaces the active role.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub surename: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
}

pub fn validate_role_code(code: &str) -> Result<(), ValidationError> {
    if role_codes::is_known(code) {
        Ok(())
    } else {
        Err(ValidationError::new("role").with_message("The selected role is invalid.".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub surename: String,
    #[validate(length(min = 5, message = "password must be at least 5 characters"))]
    pub password: String,
    #[validate(custom(function = "validate_role_code"))]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub surename: Option<String>,
    #[validate(length(min = 5, message = "password must be at least 5 characters"))]
    pub password: Option<String>,
    #[validate(custom(function = "validate_role_code"))]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleListResponse {
    #[schema(value_type = Object)]
    pub data: BTreeMap<&'static str, &'static str>,
}
