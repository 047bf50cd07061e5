//! Error types for account persistence.

use std::borrow::Cow;

/// Result type for all store operations.
pub type StoreResult<T, E = StoreError> = Result<T, E>;

/// Error type for account persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[must_use = "store errors should be handled appropriately"]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("Record not found")]
    NotFound,

    /// An insert would violate a uniqueness constraint.
    ///
    /// The constraint name identifies which unique key was hit.
    #[error("Unique constraint violation: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: Cow<'static, str>,
    },

    /// The store could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(Cow<'static, str>),
}

impl StoreError {
    /// Creates a uniqueness violation for the named constraint.
    pub fn unique_violation(constraint: impl Into<Cow<'static, str>>) -> Self {
        Self::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    /// Creates an unavailability error with the given message.
    pub fn unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Returns `true` if the error signals a missing record.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns `true` if the error signals a uniqueness constraint violation.
    #[inline]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    /// Returns the violated constraint name, if any.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } => Some(constraint),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_helpers() {
        assert!(StoreError::NotFound.is_not_found());
        assert!(!StoreError::NotFound.is_unique_violation());

        let error = StoreError::unique_violation("accounts_email_address_key");
        assert!(error.is_unique_violation());
        assert_eq!(error.constraint(), Some("accounts_email_address_key"));

        let error = StoreError::unavailable("connection reset");
        assert!(!error.is_not_found());
        assert_eq!(error.constraint(), None);
        assert_eq!(error.to_string(), "Store unavailable: connection reset");
    }
}
