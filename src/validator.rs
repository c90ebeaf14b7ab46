//! JSON body extractors that validate before the handler runs.
//!
//! - [`ValidatedJson<T>`]: a flat body such as `{"email": "...", "password": "..."}`
//! - [`ValidatedData<T>`]: the `{"data": {...}}` envelope used by the CRUD endpoints;
//!   field errors are reported under `data.<field>`
//!
//! Missing fields and failed `validator` rules answer 422; unparseable bodies 400.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use sitekit_core::AppError;
use sitekit_core::errors::collect_field_errors;

use crate::utils::response::Data;

fn missing_field(error_msg: &str) -> Option<&str> {
    error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
}

fn rejection_to_error(rejection: JsonRejection, prefix: &str) -> AppError {
    let error_msg = rejection.body_text();

    if let Some(field) = missing_field(&error_msg) {
        let path = format!("{}{}", prefix, field);
        let message = format!("The {} field is required.", path);
        return AppError::invalid_field(&path, message);
    }

    if error_msg.contains("invalid type") {
        return AppError::bad_request("Invalid field type in request");
    }

    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request("Missing 'Content-Type: application/json' header");
    }

    AppError::bad_request("Invalid request body")
}

fn prefixed(errors: BTreeMap<String, Vec<String>>, prefix: &str) -> AppError {
    AppError::Validation(
        errors
            .into_iter()
            .map(|(field, messages)| (format!("{}{}", prefix, field), messages))
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| rejection_to_error(rejection, ""))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedData<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedData<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(envelope) = Json::<Data<T>>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error = rejection_to_error(rejection, "data.");
                // A missing envelope is reported as `data`, not `data.data`.
                match error {
                    AppError::Validation(errors) if errors.contains_key("data.data") => {
                        AppError::invalid_field("data", "The data field is required.")
                    }
                    other => other,
                }
            })?;

        envelope
            .data
            .validate()
            .map_err(|errors| prefixed(collect_field_errors(&errors), "data."))?;

        Ok(ValidatedData(envelope.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_name() {
        assert_eq!(
            missing_field("Failed to deserialize the JSON body into the target type: missing field `email` at line 1 column 2"),
            Some("email")
        );
        assert_eq!(missing_field("invalid type: string"), None);
    }

    #[test]
    fn test_prefixed_errors() {
        let mut errors = BTreeMap::new();
        errors.insert("title".to_string(), vec!["title is invalid".to_string()]);
        let AppError::Validation(errors) = prefixed(errors, "data.") else {
            panic!("expected validation error");
        };
        assert!(errors.contains_key("data.title"));
    }
}
