//! Startup errors raised while assembling the session service.
//!
//! Request-time failures never surface here: they are the domain errors of
//! [`service::account`] and [`service::session`]. An [`Error`] means the
//! process should refuse to start.
//!
//! [`service::account`]: crate::service::account
//! [`service::session`]: crate::service::session

use std::borrow::Cow;
use std::path::PathBuf;

use crate::service::TokenAlgorithm;

/// Result type alias for service construction.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse category of an [`Error`], used in startup logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// An option is missing, ambiguous or out of range.
    Config,
    /// The session secret cannot key the selected codec.
    Key,
    /// The secret file could not be read.
    FileSystem,
}

/// Reason the session service could not be built.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An option is missing, ambiguous or out of range.
    #[error("invalid configuration: {0}")]
    Config(Cow<'static, str>),
    /// A `base64:` secret did not decode.
    #[error("session secret is not valid base64")]
    SecretEncoding(#[source] base64::DecodeError),
    /// The secret has a size the codec cannot use.
    #[error("{algorithm} session tokens cannot use a {key_size}-byte secret: {reason}")]
    UnusableKey {
        algorithm: TokenAlgorithm,
        key_size: usize,
        reason: Cow<'static, str>,
    },
    /// The secret file could not be read.
    #[error("failed to read session secret file {}", path.display())]
    SecretFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an error for a secret the `algorithm` codec cannot use.
    #[inline]
    pub fn unusable_key(
        algorithm: TokenAlgorithm,
        key_size: usize,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::UnusableKey {
            algorithm,
            key_size,
            reason: reason.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::SecretEncoding(_) => ErrorKind::Config,
            Self::UnusableKey { .. } => ErrorKind::Key,
            Self::SecretFile { .. } => ErrorKind::FileSystem,
        }
    }
}
