//! # sitekit Auth
//!
//! JWT access tokens for the sitekit API.
//!
//! - [`claims`]: the claim set carried by every access token
//! - [`jwt`]: token creation and verification
//!
//! A token alone is not enough to authenticate: its `jti` must also be present in
//! the access token store, which is how logout and password resets revoke tokens.
//!
//! # Example
//!
//! ```ignore
//! use sitekit_auth::{create_access_token, verify_token};
//! use sitekit_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let issued = create_access_token(user.id, &user.email, &config)?;
//! let claims = verify_token(&issued.token, &config)?;
//! assert_eq!(claims.token_id()?, issued.token_id);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{IssuedToken, create_access_token, verify_token};
