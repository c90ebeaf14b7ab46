//! Six-digit email verification codes.
//!
//! A code is mailed first and stored (as a bcrypt hash) only after the mail went out.
//! Checking compares against the most recent code sent to the address. Codes never
//! expire and stay valid after a successful check.

use rand::Rng;
use tracing::instrument;

use sitekit_core::AppError;
use sitekit_core::password::{hash_password, verify_password};

use crate::modules::email_verification::model::{
    CheckVerificationCodeDto, EmailVerificationCode, SendVerificationCodeDto, VerifiedEmail,
};
use crate::store::VerificationCodeStore;
use crate::utils::email::{Mailer, VerificationMail};

pub const INCORRECT_CODE: &str = "The provided code is incorrect.";

const CODE_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

pub struct EmailVerificationService;

impl EmailVerificationService {
    pub fn generate_code() -> String {
        rand::thread_rng().gen_range(CODE_RANGE).to_string()
    }

    #[instrument(skip(store, mailer))]
    pub async fn create_model(
        store: &(impl VerificationCodeStore + ?Sized),
        mailer: &dyn Mailer,
        dto: SendVerificationCodeDto,
        bcrypt_cost: u32,
    ) -> Result<EmailVerificationCode, AppError> {
        let code = Self::generate_code();

        mailer
            .send_verification_code(&VerificationMail::new(&dto.email, &code))
            .await?;

        let code_hash = hash_password(&code, bcrypt_cost)?;
        let record = store.create_code(&dto.email, &code_hash).await?;

        tracing::info!(email = %dto.email, id = record.id, "Verification code sent");
        Ok(record)
    }

    #[instrument(skip(store, dto), fields(email = %dto.email))]
    pub async fn check_verification_code(
        store: &(impl VerificationCodeStore + ?Sized),
        dto: &CheckVerificationCodeDto,
    ) -> Result<VerifiedEmail, AppError> {
        let Some(record) = store.latest_code(&dto.email).await? else {
            tracing::debug!("No verification code on record");
            return Err(AppError::unauthorized(INCORRECT_CODE));
        };

        if !verify_password(&dto.code, &record.code)? {
            tracing::debug!("Verification code mismatch");
            return Err(AppError::unauthorized(INCORRECT_CODE));
        }

        Ok(VerifiedEmail {
            email: dto.email.clone(),
        })
    }
}
