//! JSON extractor that runs `validator` rules after deserialization.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// Deserializes a JSON body and validates it.
///
/// Both deserialization and validation failures reject with `400`; the
/// validation message lists every failing field.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;

        data.validate()?;
        Ok(Self::new(data))
    }
}

fn format_length_error(
    field: &str,
    params: &HashMap<Cow<'static, str>, serde_json::Value>,
) -> String {
    let number = |key: &str| params.get(key).and_then(serde_json::Value::as_u64);

    match (number("min"), number("max")) {
        (Some(min), Some(max)) => format!(
            "Field '{}' must be between {} and {} characters long",
            field, min, max
        ),
        (Some(min), None) => format!("Field '{}' must be at least {} characters long", field, min),
        (None, Some(max)) => format!("Field '{}' must be at most {} characters long", field, max),
        _ => format!("Field '{}' has invalid length", field),
    }
}

fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return format!("Field '{}': {}", field, custom_message);
    }

    let message = match error.code.as_ref() {
        "required" => "is required and cannot be empty",
        "length" => return format_length_error(field, &error.params),
        "email" => "must be a valid email address (e.g., user@example.com)",
        code => return format!("Field '{}' failed validation: {}", field, code),
    };

    format!("Field '{}' {}", field, message)
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let mut error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();

        // Field order comes from a map.
        error_messages.sort();

        let user_message = match error_messages.as_slice() {
            [] => "Validation failed".to_string(),
            [single_error] => single_error.clone(),
            multiple => multiple.join(". "),
        };

        tracing::debug!(
            fields = ?errors.field_errors().keys().collect::<Vec<_>>(),
            "request validation failed",
        );

        ErrorKind::BadRequest
            .with_message(user_message)
            .with_resource("request")
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 4))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn validation_errors_name_every_field() {
        let sample = Sample {
            name: "too long".to_owned(),
            email: "not-an-email".to_owned(),
        };

        let error = Error::from(sample.validate().unwrap_err());
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let message = error.message();
        assert!(message.contains("Field 'name' must be between 1 and 4 characters long"));
        assert!(message.contains("Field 'email' must be a valid email address"));
    }
}
