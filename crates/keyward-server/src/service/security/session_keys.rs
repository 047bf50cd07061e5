//! Session secret management for token signing and encryption.
//!
//! The secret is loaded once at startup, either inline from configuration or
//! from a file, and held read-only for the process lifetime.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::TRACING_TARGET_SESSION_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// Prefix marking a base64-encoded secret.
const BASE64_PREFIX: &str = "base64:";

/// Session secret configuration.
///
/// Exactly one of `token_secret` or `token_secret_file` must be set. Either
/// value may carry a `base64:` prefix to supply raw key bytes.
#[derive(Clone, Default, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Inline session secret.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "TOKEN_SECRET", hide_env_values = true)
    )]
    #[serde(default)]
    pub token_secret: Option<String>,

    /// File path to the session secret.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "TOKEN_SECRET_FILE")
    )]
    #[serde(default)]
    pub token_secret_file: Option<PathBuf>,
}

impl SessionKeysConfig {
    /// Creates a configuration with an inline secret.
    pub fn from_secret(secret: impl Into<String>) -> Self {
        Self {
            token_secret: Some(secret.into()),
            token_secret_file: None,
        }
    }

    /// Creates a configuration that reads the secret from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            token_secret: None,
            token_secret_file: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Checks that exactly one secret source is set.
    pub fn validate(&self) -> Result<()> {
        match (&self.token_secret, &self.token_secret_file) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(Error::config(
                "only one of token secret and token secret file may be set",
            )),
            (None, None) => Err(Error::config(
                "either token secret or token secret file must be set",
            )),
        }
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("token_secret", &self.token_secret.as_ref().map(|_| "[redacted]"))
            .field("token_secret_file", &self.token_secret_file)
            .finish()
    }
}

/// Process-wide secret used to sign or encrypt session tokens.
///
/// Cloning is cheap; clones share the same key material.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    secret: Vec<u8>,
    source: Option<PathBuf>,
}

impl SessionKeys {
    /// Loads the session secret described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither or both sources are set, the file cannot be
    /// read, the base64 payload is invalid, or the resulting secret is empty.
    pub async fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        config.validate()?;

        match (&config.token_secret, &config.token_secret_file) {
            (Some(secret), _) => {
                tracing::debug!(target: TRACING_TARGET, "loading inline session secret");
                Self::from_encoded(secret.as_bytes(), None)
            }
            (None, Some(path)) => {
                let contents = Self::read_secret_file(path).await?;
                Self::from_encoded(&contents, Some(path.clone()))
            }
            (None, None) => Err(Error::config(
                "either token secret or token secret file must be set",
            )),
        }
    }

    /// Wraps raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `secret` is empty.
    pub fn from_bytes(secret: impl Into<Vec<u8>>) -> Result<Self> {
        Self::with_source(secret.into(), None)
    }

    fn with_source(secret: Vec<u8>, source: Option<PathBuf>) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::config("session secret must not be empty"));
        }

        Ok(Self {
            inner: Arc::new(SessionKeysInner { secret, source }),
        })
    }

    /// Returns the raw secret bytes.
    #[inline]
    pub fn secret(&self) -> &[u8] {
        &self.inner.secret
    }

    /// Returns the secret length in bytes.
    #[inline]
    pub fn key_size(&self) -> usize {
        self.inner.secret.len()
    }

    /// Returns the file the secret was read from, if any.
    #[inline]
    pub fn source(&self) -> Option<&Path> {
        self.inner.source.as_deref()
    }

    fn from_encoded(raw: &[u8], source: Option<PathBuf>) -> Result<Self> {
        let raw = strip_line_ending(raw);

        let secret = match raw.strip_prefix(BASE64_PREFIX.as_bytes()) {
            Some(encoded) => STANDARD.decode(encoded).map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "failed to decode base64 session secret",
                );
                Error::SecretEncoding(e)
            })?,
            None => raw.to_vec(),
        };

        let keys = Self::with_source(secret, source)?;

        tracing::info!(
            target: TRACING_TARGET,
            key_size_bytes = keys.key_size(),
            "session secret loaded",
        );

        Ok(keys)
    }

    async fn read_secret_file(path: &Path) -> Result<Vec<u8>> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            "loading session secret from file",
        );

        tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "failed to read session secret file",
            );
            Error::SecretFile {
                path: path.to_path_buf(),
                source: e,
            }
        })
    }
}

/// Strips a single trailing `\n` or `\r\n`, as left behind by editors.
fn strip_line_ending(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("key_size", &self.key_size())
            .field("source", &self.inner.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn load_inline_secret() -> anyhow::Result<()> {
        let config = SessionKeysConfig::from_secret("0123456789abcdef0123456789abcdef");
        let keys = SessionKeys::from_config(&config).await?;

        assert_eq!(keys.key_size(), 32);
        assert!(keys.source().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn load_secret_file_strips_newline() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("secret");
        fs::write(&path, "0123456789abcdef0123456789abcdef\n")?;

        let keys = SessionKeys::from_config(&SessionKeysConfig::from_file(&path)).await?;

        assert_eq!(keys.secret(), b"0123456789abcdef0123456789abcdef");
        assert_eq!(keys.source(), Some(path.as_path()));
        Ok(())
    }

    #[tokio::test]
    async fn load_base64_secret() -> anyhow::Result<()> {
        let encoded = format!("base64:{}", STANDARD.encode([7u8; 32]));
        let keys = SessionKeys::from_config(&SessionKeysConfig::from_secret(encoded)).await?;

        assert_eq!(keys.secret(), &[7u8; 32]);
        Ok(())
    }

    #[tokio::test]
    async fn reject_invalid_base64() {
        let config = SessionKeysConfig::from_secret("base64:!!not-base64!!");
        let error = SessionKeys::from_config(&config)
            .await
            .expect_err("payload is not base64");
        assert!(matches!(error, crate::Error::SecretEncoding(_)));
    }

    #[tokio::test]
    async fn reject_missing_and_conflicting_sources() {
        let error = SessionKeys::from_config(&SessionKeysConfig::default())
            .await
            .expect_err("no source configured");
        assert_eq!(error.kind(), crate::ErrorKind::Config);

        let config = SessionKeysConfig {
            token_secret: Some("secret".to_owned()),
            token_secret_file: Some("./secret".into()),
        };
        let error = SessionKeys::from_config(&config)
            .await
            .expect_err("both sources configured");
        assert_eq!(error.kind(), crate::ErrorKind::Config);
    }

    #[tokio::test]
    async fn reject_missing_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let config = SessionKeysConfig::from_file(temp_dir.path().join("nonexistent"));

        let error = SessionKeys::from_config(&config)
            .await
            .expect_err("file does not exist");
        assert_eq!(error.kind(), crate::ErrorKind::FileSystem);
        Ok(())
    }

    #[test]
    fn reject_empty_secret() {
        assert!(SessionKeys::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn debug_hides_secret() -> anyhow::Result<()> {
        let keys = SessionKeys::from_bytes(b"super-secret-value".to_vec())?;
        assert!(!format!("{keys:?}").contains("super-secret"));

        let config = SessionKeysConfig::from_secret("super-secret-value");
        assert!(!format!("{config:?}").contains("super-secret"));
        Ok(())
    }
}
