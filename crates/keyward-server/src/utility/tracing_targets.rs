//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters.

/// Authentication-related operations including bearer token extraction.
pub const TRACING_TARGET_AUTHENTICATION: &str = "keyward_server::authentication";

/// Account registration, login and profile lookups.
pub const TRACING_TARGET_ACCOUNTS: &str = "keyward_server::accounts";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "keyward_server::recovery::error";

/// Panic recovery including handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "keyward_server::recovery::panic";

/// Password hashing and verification operations.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "keyward_server::password_hasher";

/// Session secret loading and key material checks.
pub const TRACING_TARGET_SESSION_KEYS: &str = "keyward_server::session_keys";

/// Session token issuance and validation.
pub const TRACING_TARGET_SESSION_CODEC: &str = "keyward_server::session_codec";
