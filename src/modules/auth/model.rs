use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use sitekit_core::serde::deserialize_string_or_number;

use crate::modules::email_verification::model::validate_numeric_code;
use crate::modules::users::model::User;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Self sign-up, gated by a verification code mailed to `email`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub surename: String,
    #[validate(length(min = 5, message = "password must be at least 5 characters"))]
    pub password: String,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    #[validate(custom(function = "validate_numeric_code"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    #[validate(custom(function = "validate_numeric_code"))]
    pub code: String,
    #[validate(length(min = 5, message = "password must be at least 5 characters"))]
    pub password: String,
}

/// A bearer token and the user it belongs to.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_accepts_numeric_code() {
        let dto: RegisterRequest = serde_json::from_value(json!({
            "email": "a@x.uz",
            "name": "Ali",
            "surename": "Valiyev",
            "password": "secret1",
            "code": 123456
        }))
        .unwrap();
        assert_eq!(dto.code, "123456");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_reset_rejects_short_password_and_non_numeric_code() {
        let dto: ResetPasswordRequest = serde_json::from_value(json!({
            "email": "a@x.uz",
            "code": "12ab",
            "password": "abc"
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("code"));
        assert!(fields.contains_key("password"));
    }
}
