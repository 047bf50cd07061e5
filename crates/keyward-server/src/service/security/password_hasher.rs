//! Secure password hashing and verification using Argon2id.
//!
//! Hashes are produced in PHC string format with a fresh random salt per call,
//! so the stored string carries the algorithm, parameters and salt needed to
//! verify it later.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};

use crate::utility::tracing_targets::TRACING_TARGET_PASSWORD_HASHER as TRACING_TARGET;

/// Failure of the password hashing backend.
///
/// A password mismatch is not an error; see [`PasswordHasher::verify_password`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashingError {
    /// Hashing a new password failed.
    #[error("password hashing failed: {0}")]
    Hash(ArgonError),
    /// The stored hash could not be parsed or used.
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(ArgonError),
}

/// Password hashing and verification service using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    pub fn new() -> Self {
        let argon2 = Argon2::default();
        Self { argon2 }
    }

    /// Hashes a password using Argon2id with a cryptographically secure random salt.
    ///
    /// # Arguments
    ///
    /// * `password` - The plaintext password to hash
    ///
    /// # Returns
    ///
    /// A PHC string format hash that includes the algorithm, parameters, salt,
    /// and hash value.
    ///
    /// # Errors
    ///
    /// Returns [`HashingError::Hash`] if the hashing operation fails.
    pub fn hash_password(&self, password: &str) -> Result<String, HashingError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing operation failed"
                );
                HashingError::Hash(e)
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored hash.
    ///
    /// Comparison is constant-time.
    ///
    /// # Arguments
    ///
    /// * `password` - The plaintext password to verify
    /// * `stored_hash` - The PHC string format hash retrieved from storage
    ///
    /// # Returns
    ///
    /// `true` if the password matches, `false` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`HashingError::MalformedHash`] if the stored hash cannot be
    /// parsed or names unsupported parameters.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, HashingError> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "invalid password hash format"
            );
            HashingError::MalformedHash(e)
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "password verification failed: incorrect password"
                );
                Ok(false)
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification system error"
                );
                Err(HashingError::MalformedHash(e))
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let password = "secure_password_123";
        let hash = hasher.hash_password(password)?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password(password, &hash)?);
        assert!(!hasher.verify_password("wrong_password", &hash)?);

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let password = "test_password";

        let hash1 = hasher.hash_password(password)?;
        let hash2 = hasher.hash_password(password)?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_password(password, &hash1)?);
        assert!(hasher.verify_password(password, &hash2)?);

        Ok(())
    }

    #[test]
    fn hash_of_other_password_does_not_verify() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("Test123!")?;

        assert!(!hasher.verify_password("Test1234!", &hash)?);
        assert!(!hasher.verify_password("", &hash)?);

        Ok(())
    }

    #[test]
    fn verify_password_returns_error_for_invalid_hash() {
        let hasher = PasswordHasher::new();

        let result = hasher.verify_password("test_password", "invalid_hash_format");
        assert!(matches!(result, Err(HashingError::MalformedHash(_))));
    }
}
