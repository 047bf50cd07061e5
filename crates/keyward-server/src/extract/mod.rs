//! Request extractors with structured rejections.
//!
//! - [`AuthHeader`] decodes the bearer session token into [`SessionClaims`].
//! - [`Json`] and [`ValidateJson`] deserialize (and validate) request bodies.
//!
//! [`SessionClaims`]: crate::service::SessionClaims

pub mod auth;
pub mod reject;

pub use crate::extract::auth::AuthHeader;
pub use crate::extract::reject::{Json, ValidateJson};
