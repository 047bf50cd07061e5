//! Session token issuance and validation.
//!
//! A session is a pair of stateless tokens (access and refresh) embedding the
//! same claims apart from token id and expiration. Two interchangeable codecs
//! implement [`TokenCodec`]:
//!
//! - [`JwtCodec`]: signed claims (HMAC-SHA2)
//! - [`PasetoCodec`]: encrypted claims (PASETO `v4.local`)
//!
//! [`SessionCodec`] selects one of them once at startup from a
//! [`TokenAlgorithm`].

mod claims;
mod clock;
mod error;
mod jwt;
mod paseto;

use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::ValueEnum;
use keyward_store::AccountId;
use serde::{Deserialize, Serialize};

pub use crate::service::session::claims::{
    SessionClaims, SessionLifetimes, SessionPair, SessionSettings,
};
pub use crate::service::session::clock::{Clock, ManualClock, SystemClock};
pub use crate::service::session::error::{IssueError, TokenError};
pub use crate::service::session::jwt::JwtCodec;
pub use crate::service::session::paseto::PasetoCodec;
use crate::service::SessionKeys;
use crate::Result;

/// Token algorithm family used for sessions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[cfg_attr(any(test, feature = "config"), derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TokenAlgorithm {
    /// Signed claims (JWT, HS256).
    #[default]
    Jwt,
    /// Encrypted claims (PASETO `v4.local`).
    Paseto,
}

/// Issues and validates session tokens.
pub trait TokenCodec: Send + Sync {
    /// Returns the algorithm family of this codec.
    fn algorithm(&self) -> TokenAlgorithm;

    /// Issues a fresh access/refresh pair for `subject`.
    fn issue(&self, subject: AccountId) -> Result<SessionPair, IssueError>;

    /// Verifies `token` and returns its claims.
    ///
    /// Checks integrity, issuer and audience, then requires
    /// `not_before <= now < expires_at`.
    fn decode(&self, token: &str) -> Result<SessionClaims, TokenError>;

    /// Verifies `token`, discarding its claims.
    fn validate(&self, token: &str) -> Result<(), TokenError> {
        self.decode(token).map(|_| ())
    }
}

/// Session codec selected at startup.
#[derive(Debug, Clone)]
pub enum SessionCodec {
    /// Signed claims.
    Signed(JwtCodec),
    /// Encrypted claims.
    Encrypted(PasetoCodec),
}

impl SessionCodec {
    /// Creates the codec for `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret does not fit the algorithm.
    pub fn new(
        algorithm: TokenAlgorithm,
        keys: &SessionKeys,
        settings: SessionSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let codec = match algorithm {
            TokenAlgorithm::Jwt => Self::Signed(JwtCodec::new(keys, settings, clock)?),
            TokenAlgorithm::Paseto => Self::Encrypted(PasetoCodec::new(keys, settings, clock)?),
        };

        Ok(codec)
    }
}

impl TokenCodec for SessionCodec {
    fn algorithm(&self) -> TokenAlgorithm {
        match self {
            Self::Signed(codec) => codec.algorithm(),
            Self::Encrypted(codec) => codec.algorithm(),
        }
    }

    fn issue(&self, subject: AccountId) -> Result<SessionPair, IssueError> {
        match self {
            Self::Signed(codec) => codec.issue(subject),
            Self::Encrypted(codec) => codec.issue(subject),
        }
    }

    fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        match self {
            Self::Signed(codec) => codec.decode(token),
            Self::Encrypted(codec) => codec.decode(token),
        }
    }
}

impl From<JwtCodec> for SessionCodec {
    fn from(codec: JwtCodec) -> Self {
        Self::Signed(codec)
    }
}

impl From<PasetoCodec> for SessionCodec {
    fn from(codec: PasetoCodec) -> Self {
        Self::Encrypted(codec)
    }
}
