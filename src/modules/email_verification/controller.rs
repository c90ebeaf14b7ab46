use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use sitekit_core::AppError;

use crate::modules::email_verification::model::{
    CheckVerificationCodeDto, EmailVerificationCode, SendVerificationCodeDto, VerifiedEmail,
};
use crate::modules::email_verification::service::EmailVerificationService;
use crate::state::AppState;
use crate::utils::response::{Data, ErrorResponse};
use crate::validator::ValidatedData;

/// Mail a fresh six-digit code to the address
#[utoipa::path(
    post,
    path = "/api/email-verification",
    request_body = Data<SendVerificationCodeDto>,
    responses(
        (status = 201, description = "Code sent", body = Data<EmailVerificationCode>),
        (status = 422, description = "Invalid email", body = ErrorResponse),
        (status = 500, description = "Mail could not be sent", body = ErrorResponse)
    ),
    tag = "Email verification"
)]
#[instrument(skip(state))]
pub async fn send_email_verification(
    State(state): State<AppState>,
    ValidatedData(dto): ValidatedData<SendVerificationCodeDto>,
) -> Result<(StatusCode, Json<Data<EmailVerificationCode>>), AppError> {
    let record = EmailVerificationService::create_model(
        state.store(),
        state.mailer.as_ref(),
        dto,
        state.security_config.bcrypt_cost,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Data::new(record))))
}

/// Check a code against the latest one sent to the address
#[utoipa::path(
    post,
    path = "/api/check-email-verification",
    request_body = Data<CheckVerificationCodeDto>,
    responses(
        (status = 200, description = "Code matches", body = Data<VerifiedEmail>),
        (status = 401, description = "The provided code is incorrect.", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Email verification"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn check_email_verification(
    State(state): State<AppState>,
    ValidatedData(dto): ValidatedData<CheckVerificationCodeDto>,
) -> Result<Json<Data<VerifiedEmail>>, AppError> {
    let verified = EmailVerificationService::check_verification_code(state.store(), &dto).await?;
    Ok(Json(Data::new(verified)))
}
