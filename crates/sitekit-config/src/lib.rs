//! # sitekit Config
//!
//! Configuration types for the sitekit API, each loaded from environment variables:
//!
//! - [`cors`]: CORS allowed origins
//! - [`email`]: SMTP settings for verification mail
//! - [`jwt`]: Access token signing
//! - [`rbac`]: Location of the role permission table
//! - [`security`]: bcrypt cost
//! - [`server`]: Bind address
//! - [`upload`]: Upload directory and size limit
//!
//! # Example
//!
//! ```ignore
//! use sitekit_config::{JwtConfig, RbacConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let permissions = RbacConfig::from_env().load()?;
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod rbac;
pub mod security;
pub mod server;
pub mod upload;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use rbac::RbacConfig;
pub use security::SecurityConfig;
pub use server::ServerConfig;
pub use upload::UploadConfig;
