//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::deserialize_normalized;

/// Request payload for registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Register {
    /// Display name of the account.
    #[validate(length(min = 1, max = 64))]
    pub name: String,

    /// Email address of the account, normalized on deserialization.
    #[serde(deserialize_with = "deserialize_normalized")]
    #[validate(email)]
    #[validate(length(max = 254))]
    pub email: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Login {
    /// Email address of the account, normalized on deserialization.
    #[serde(deserialize_with = "deserialize_normalized")]
    #[validate(email)]
    #[validate(length(max = 254))]
    pub email: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn register_normalizes_email() -> anyhow::Result<()> {
        let request: Register = serde_json::from_str(
            r#"{"name": "Alice", "email": "  Alice@Example.COM ", "password": "pw"}"#,
        )?;

        assert_eq!(request.email, "alice@example.com");
        assert!(request.validate().is_ok());
        Ok(())
    }

    #[test]
    fn register_enforces_lengths() -> anyhow::Result<()> {
        let request: Register = serde_json::from_value(serde_json::json!({
            "name": "",
            "email": "alice@example.com",
            "password": "x".repeat(129),
        }))?;

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("email"));
        Ok(())
    }

    #[test]
    fn login_rejects_invalid_email() -> anyhow::Result<()> {
        let request: Login =
            serde_json::from_str(r#"{"email": "not-an-email", "password": "pw"}"#)?;

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        Ok(())
    }

    #[test]
    fn login_rejects_missing_fields() {
        let result = serde_json::from_str::<Login>(r#"{"email": "alice@example.com"}"#);
        assert!(result.is_err());
    }
}
