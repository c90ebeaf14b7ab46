//! # sitekit Core
//!
//! Core types, errors, and utilities shared by every sitekit crate:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`file_storage`]: Storage backend abstraction for uploaded files
//! - [`pagination`]: Pagination parameters and response metadata
//! - [`password`]: bcrypt hashing for passwords and one-time codes
//! - [`permissions`]: The static role → resource → action permission table
//! - [`serde`]: Custom deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use sitekit_core::{AppError, PermissionTable, Role};
//!
//! let table: PermissionTable = serde_json::from_str(raw)?;
//! table.authorize(&Role::guest(), "abouts.index")?;
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use permissions::{AccessDenied, PermissionTable, Role};
