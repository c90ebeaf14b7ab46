//! Outgoing mail.
//!
//! Services send mail through the [`Mailer`] trait. [`EmailService`] delivers over
//! SMTP with `lettre`; [`LogMailer`] only writes a log line and is used when
//! `SMTP_ENABLED` is off.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use sitekit_config::EmailConfig;
use sitekit_core::AppError;

/// The verification code mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationMail {
    pub to: String,
    pub code: String,
}

impl VerificationMail {
    pub const SUBJECT: &'static str = "Email Verification Code";

    pub fn new(to: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            code: code.into(),
        }
    }

    fn text_body(&self) -> String {
        format!(
            "Hello,\n\n\
             Your verification code is: {}\n\n\
             If you did not request this code, please ignore this email.",
            self.code
        )
    }

    fn html_body(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{subject}</title>
</head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; padding: 40px 30px;">
                    <tr>
                        <td>
                            <h2 style="margin: 0 0 20px 0; color: #333333;">{subject}</h2>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px;">Your verification code is:</p>
                            <p style="margin: 0 0 20px 0; color: #111111; font-size: 32px; letter-spacing: 6px; font-weight: bold;">{code}</p>
                            <p style="margin: 0; color: #999999; font-size: 12px;">If you did not request this code, please ignore this email.</p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            subject = Self::SUBJECT,
            code = self.code
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_code(&self, mail: &VerificationMail) -> Result<(), AppError>;
}

/// Picks the SMTP mailer or the log mailer based on `EmailConfig::enabled`.
pub fn mailer_from_config(config: &EmailConfig) -> Arc<dyn Mailer> {
    if config.enabled {
        Arc::new(EmailService::new(config.clone()))
    } else {
        Arc::new(LogMailer)
    }
}

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl Mailer for EmailService {
    #[instrument(skip(self, mail), fields(to = %mail.to))]
    async fn send_verification_code(&self, mail: &VerificationMail) -> Result<(), AppError> {
        self.send_email(
            &mail.to,
            VerificationMail::SUBJECT,
            &mail.text_body(),
            &mail.html_body(),
        )
        .await
    }
}

/// Writes the mail to the log instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_code(&self, mail: &VerificationMail) -> Result<(), AppError> {
        tracing::info!(to = %mail.to, "SMTP disabled; verification mail not sent");
        tracing::debug!(to = %mail.to, code = %mail.code, "Verification code");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Keeps every mail in memory.
    #[derive(Default)]
    pub struct RecordingMailer {
        sent: Mutex<Vec<VerificationMail>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent(&self) -> Vec<VerificationMail> {
            self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
        }

        pub fn last_code_for(&self, email: &str) -> Option<String> {
            self.sent()
                .into_iter()
                .rev()
                .find(|mail| mail.to == email)
                .map(|mail| mail.code)
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_verification_code(&self, mail: &VerificationMail) -> Result<(), AppError> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(mail.clone());
            }
            Ok(())
        }
    }

    /// Fails every send.
    pub struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send_verification_code(&self, _mail: &VerificationMail) -> Result<(), AppError> {
            Err(AppError::internal_error("SMTP server unavailable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingMailer;
    use super::*;

    #[test]
    fn test_bodies_contain_code() {
        let mail = VerificationMail::new("a@example.com", "123456");
        assert!(mail.text_body().contains("123456"));
        assert!(mail.html_body().contains("123456"));
        assert!(mail.html_body().contains(VerificationMail::SUBJECT));
    }

    #[tokio::test]
    async fn test_recording_mailer_keeps_latest_code() {
        let mailer = RecordingMailer::new();
        mailer
            .send_verification_code(&VerificationMail::new("a@example.com", "111111"))
            .await
            .unwrap();
        mailer
            .send_verification_code(&VerificationMail::new("a@example.com", "222222"))
            .await
            .unwrap();
        assert_eq!(mailer.last_code_for("a@example.com").as_deref(), Some("222222"));
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_log_mailer_succeeds() {
        let mail = VerificationMail::new("a@example.com", "123456");
        assert!(LogMailer.send_verification_code(&mail).await.is_ok());
    }
}
