//! Session token error types.

/// Reason a token string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TokenError {
    /// The token could not be decoded into a well-formed claim set.
    #[error("session token is malformed")]
    Malformed,
    /// The integrity or authenticity check failed.
    #[error("session token signature is invalid")]
    BadSignature,
    /// The expiration instant has passed.
    #[error("session token has expired")]
    Expired,
    /// The not-before instant lies in the future.
    #[error("session token is not yet valid")]
    NotYetValid,
}

impl TokenError {
    /// Returns a stable snake_case identifier for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
            Self::NotYetValid => "not_yet_valid",
        }
    }
}

/// Failure while issuing a session pair.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    /// Issuance instant plus lifetime falls outside the supported time range.
    #[error("session lifetime exceeds the supported time range")]
    TimeRange(#[source] jiff::Error),
    /// Claims could not be serialized.
    #[error("failed to serialize session claims")]
    Serialize(#[source] serde_json::Error),
    /// The signing backend rejected the claims.
    #[error("failed to sign session token")]
    Sign(#[source] jsonwebtoken::errors::Error),
    /// The encryption backend rejected the claims.
    #[error("failed to encrypt session token: {0}")]
    Encrypt(pasetors::errors::Error),
}
