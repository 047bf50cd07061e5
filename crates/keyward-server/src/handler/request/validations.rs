//! Request normalization helpers.

use serde::{Deserialize, Deserializer};

fn normalize_string(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Deserializes a string and normalizes it (trimmed, lower-cased).
///
/// Runs before validation, so `" Alice@Example.COM "` validates as
/// `"alice@example.com"`.
pub fn deserialize_normalized<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(normalize_string(&value))
}
