//! Credential and key material services.
//!
//! This module provides password hashing and verification, and loading of the
//! process-wide session secret.

mod password_hasher;
mod session_keys;

pub use password_hasher::{HashingError, PasswordHasher};
pub use session_keys::{SessionKeys, SessionKeysConfig};
