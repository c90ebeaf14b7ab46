//! Creation and verification of HS256 access tokens.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use sitekit_config::JwtConfig;
use sitekit_core::AppError;

use crate::claims::Claims;

/// An encoded token together with the id it must be registered under.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: Uuid,
}

/// Creates an access token for `user_id` with a fresh `jti`.
///
/// The caller is responsible for storing `token_id`; an unregistered token is
/// rejected by the authentication middleware.
pub fn create_access_token(
    user_id: i64,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<IssuedToken, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;
    let token_id = Uuid::new_v4();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        jti: token_id.to_string(),
        exp,
        iat: now,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))?;

    Ok(IssuedToken { token, token_id })
}

/// Checks signature and expiry and returns the claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Unauthenticated."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig::new("test-secret-key-at-least-32-characters-long", 3600)
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = get_test_jwt_config();

        let issued = create_access_token(12, "test@example.com", &config).unwrap();
        assert!(!issued.token.is_empty());

        let claims = verify_token(&issued.token, &config).unwrap();
        assert_eq!(claims.user_id().unwrap(), 12);
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.token_id().unwrap(), issued.token_id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_each_token_gets_a_new_id() {
        let config = get_test_jwt_config();
        let first = create_access_token(1, "a@example.com", &config).unwrap();
        let second = create_access_token(1, "a@example.com", &config).unwrap();
        assert_ne!(first.token_id, second.token_id);
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        let result = verify_token("invalid-token", &config);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let issued = create_access_token(1, "test@example.com", &config).unwrap();

        let wrong_config = JwtConfig::new("different-secret-key-at-least-32-characters", 3600);
        assert!(verify_token(&issued.token, &wrong_config).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "1".to_string(),
            email: "old@example.com".to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, &config).is_err());
    }
}
