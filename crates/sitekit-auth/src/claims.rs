//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use sitekit_core::AppError;

/// Claims embedded in an access token.
///
/// - `sub`: user id
/// - `email`: user's email address at issue time
/// - `jti`: token id, looked up in the access token store on every request
/// - `exp` / `iat`: expiry and issued-at Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid token subject"))
    }

    pub fn token_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.jti).map_err(|_| AppError::unauthorized("Invalid token id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "42".to_string(),
            email: "test@example.com".to_string(),
            jti: Uuid::nil().to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"42""#));
        assert!(serialized.contains(r#""email":"test@example.com""#));
    }

    #[test]
    fn test_claims_accessors() {
        let jti = Uuid::new_v4();
        let json = format!(
            r#"{{"sub":"7","email":"user@test.com","jti":"{}","exp":9999999999,"iat":9999999900}}"#,
            jti
        );
        let claims: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.token_id().unwrap(), jti);
    }

    #[test]
    fn test_malformed_subject_and_jti_are_unauthorized() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            email: "x@test.com".to_string(),
            jti: "not-a-uuid".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(matches!(claims.user_id(), Err(AppError::Unauthorized(_))));
        assert!(matches!(claims.token_id(), Err(AppError::Unauthorized(_))));
    }
}
