use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use sitekit_auth::create_access_token;
use sitekit_config::JwtConfig;
use sitekit_core::AppError;
use sitekit_core::password::{hash_password, verify_password};

use crate::modules::auth::model::{AuthSession, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::modules::email_verification::model::CheckVerificationCodeDto;
use crate::modules::email_verification::service::EmailVerificationService;
use crate::modules::users::model::{NewUser, User, UserChanges, role_codes};
use crate::modules::users::service::EMAIL_TAKEN;
use crate::store::{AccessTokenStore, Store, StoreError, UserStore};

pub const INVALID_CREDENTIALS: &str = "The provided credentials are incorrect.";

pub struct AuthService;

impl AuthService {
    /// Signs a token for `user` and records its id so it can be revoked.
    pub async fn issue_session(
        store: &(impl AccessTokenStore + ?Sized),
        user: User,
        jwt_config: &JwtConfig,
    ) -> Result<AuthSession, AppError> {
        let issued = create_access_token(user.id, &user.email, jwt_config)?;
        store.register_token(user.id, issued.token_id).await?;

        Ok(AuthSession {
            token: issued.token,
            user,
        })
    }

    #[instrument(skip(store, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        store: &dyn Store,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthSession, AppError> {
        let user = store
            .find_user_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&dto.password, &user.password)? {
            tracing::warn!(user_id = user.id, "Login with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let session = Self::issue_session(store, user, jwt_config).await?;
        tracing::info!(user_id = session.user.id, "User logged in");
        Ok(session)
    }

    #[instrument(skip(store, dto, jwt_config), fields(email = %dto.email))]
    pub async fn register(
        store: &dyn Store,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
        bcrypt_cost: u32,
    ) -> Result<AuthSession, AppError> {
        EmailVerificationService::check_verification_code(
            store,
            &CheckVerificationCodeDto {
                email: dto.email.clone(),
                code: dto.code.clone(),
            },
        )
        .await?;

        if store.find_user_by_email(&dto.email).await?.is_some() {
            return Err(AppError::invalid_field("email", EMAIL_TAKEN));
        }

        let password_hash = hash_password(&dto.password, bcrypt_cost)?;
        let user = store
            .create_user(NewUser {
                email: dto.email,
                name: dto.name,
                surename: dto.surename,
                password_hash,
                email_verified_at: Some(Utc::now()),
                role: Some(role_codes::USER.to_string()),
            })
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => AppError::invalid_field("email", EMAIL_TAKEN),
                other => other.into(),
            })?;

        tracing::info!(user_id = user.id, "User registered");
        Self::issue_session(store, user, jwt_config).await
    }

    /// Replaces the password and revokes every token of the user.
    #[instrument(skip(store, dto), fields(email = %dto.email))]
    pub async fn reset_password(
        store: &dyn Store,
        dto: ResetPasswordRequest,
        bcrypt_cost: u32,
    ) -> Result<User, AppError> {
        EmailVerificationService::check_verification_code(
            store,
            &CheckVerificationCodeDto {
                email: dto.email.clone(),
                code: dto.code.clone(),
            },
        )
        .await?;

        let user = store
            .find_user_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let password_hash = hash_password(&dto.password, bcrypt_cost)?;
        let user = store
            .update_user(
                user.id,
                UserChanges {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?;

        let revoked = store.revoke_user_tokens(user.id).await?;
        tracing::info!(user_id = user.id, revoked, "Password reset");
        Ok(user)
    }

    #[instrument(skip(store))]
    pub async fn logout(store: &dyn Store, token_id: Uuid) -> Result<(), AppError> {
        store.revoke_token(token_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::email_verification::model::SendVerificationCodeDto;
    use crate::store::memory::MemoryStore;
    use crate::utils::email::testing::RecordingMailer;
    use sitekit_auth::verify_token;
    use sitekit_core::password::MIN_COST;

    fn jwt() -> JwtConfig {
        JwtConfig::new("test-secret", 3600)
    }

    async fn mailed_code(store: &MemoryStore, email: &str) -> String {
        let mailer = RecordingMailer::new();
        EmailVerificationService::create_model(
            store,
            &mailer,
            SendVerificationCodeDto {
                email: email.to_string(),
            },
            MIN_COST,
        )
        .await
        .unwrap();
        mailer.last_code_for(email).unwrap()
    }

    fn register_dto(email: &str, code: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            name: "Ali".to_string(),
            surename: "Valiyev".to_string(),
            password: "secret1".to_string(),
            code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let code = mailed_code(&store, "a@x.uz").await;

        let session = AuthService::register(&store, register_dto("a@x.uz", &code), &jwt(), MIN_COST)
            .await
            .unwrap();
        assert_eq!(session.user.active_role_code(), Some(role_codes::USER));
        assert!(session.user.email_verified_at.is_some());

        let claims = verify_token(&session.token, &jwt()).unwrap();
        assert!(
            store
                .token_is_active(session.user.id, claims.token_id().unwrap())
                .await
                .unwrap()
        );

        let login = AuthService::login(
            &store,
            LoginRequest {
                email: "a@x.uz".to_string(),
                password: "secret1".to_string(),
            },
            &jwt(),
        )
        .await
        .unwrap();
        assert_eq!(login.user.id, session.user.id);
    }

    #[tokio::test]
    async fn test_register_with_wrong_code_is_unauthorized() {
        let store = MemoryStore::new();
        let code = mailed_code(&store, "a@x.uz").await;
        let wrong = if code == "100000" { "100001" } else { "100000" };

        let err = AuthService::register(&store, register_dto("a@x.uz", wrong), &jwt(), MIN_COST)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let store = MemoryStore::new();
        let code = mailed_code(&store, "a@x.uz").await;
        AuthService::register(&store, register_dto("a@x.uz", &code), &jwt(), MIN_COST)
            .await
            .unwrap();

        let err = AuthService::login(
            &store,
            LoginRequest {
                email: "a@x.uz".to_string(),
                password: "wrong-password".to_string(),
            },
            &jwt(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_reset_password_revokes_tokens() {
        let store = MemoryStore::new();
        let code = mailed_code(&store, "a@x.uz").await;
        let session = AuthService::register(&store, register_dto("a@x.uz", &code), &jwt(), MIN_COST)
            .await
            .unwrap();
        let token_id = verify_token(&session.token, &jwt())
            .unwrap()
            .token_id()
            .unwrap();

        let user = AuthService::reset_password(
            &store,
            ResetPasswordRequest {
                email: "a@x.uz".to_string(),
                code,
                password: "new-secret".to_string(),
            },
            MIN_COST,
        )
        .await
        .unwrap();

        assert!(verify_password("new-secret", &user.password).unwrap());
        assert!(!store.token_is_active(user.id, token_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_password_for_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let code = mailed_code(&store, "ghost@x.uz").await;

        let err = AuthService::reset_password(
            &store,
            ResetPasswordRequest {
                email: "ghost@x.uz".to_string(),
                code,
                password: "new-secret".to_string(),
            },
            MIN_COST,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
