use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use sitekit_core::serde::deserialize_string_or_number;

/// A sent verification code. Only the bcrypt hash of the code is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct EmailVerificationCode {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendVerificationCodeDto {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckVerificationCodeDto {
    #[validate(email)]
    pub email: String,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    #[validate(custom(function = "validate_numeric_code"))]
    pub code: String,
}

pub fn validate_numeric_code(code: &str) -> Result<(), ValidationError> {
    if !code.is_empty() && code.len() <= 32 && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("numeric").with_message("The code must be a number.".into()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VerifiedEmail {
    pub email: String,
}
