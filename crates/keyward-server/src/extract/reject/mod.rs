//! Request body extractors with descriptive rejections.
//!
//! Drop-in replacements for [`axum::Json`] that reject with the crate's
//! [`Error`] instead of plain-text bodies.
//!
//! [`Error`]: crate::handler::Error

mod enhanced_json;
mod validated_json;

pub use self::enhanced_json::{Json, MAX_JSON_PAYLOAD_SIZE};
pub use self::validated_json::ValidateJson;
