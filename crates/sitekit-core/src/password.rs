//! bcrypt hashing for passwords and one-time verification codes.
//!
//! The cost factor is passed in from `SecurityConfig` so tests can run with
//! [`MIN_COST`] while production keeps [`DEFAULT_COST`].

use bcrypt::{hash, verify};

use crate::errors::AppError;

pub use bcrypt::DEFAULT_COST;

/// Cost range bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

/// Returns `Ok(false)` for a wrong password and for a malformed hash.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    match verify(password, hashed) {
        Ok(valid) => Ok(valid),
        Err(bcrypt::BcryptError::InvalidHash(_)) | Err(bcrypt::BcryptError::InvalidPrefix(_)) => {
            Ok(false)
        }
        Err(e) => Err(AppError::internal_error(format!(
            "Failed to verify password: {}",
            e
        ))),
    }
}
