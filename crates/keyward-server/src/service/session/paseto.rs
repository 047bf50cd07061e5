//! Encrypted-claims session tokens (PASETO `v4.local`).

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use keyward_store::AccountId;
use pasetors::Local;
use pasetors::keys::SymmetricKey;
use pasetors::token::UntrustedToken;
use pasetors::version4::{LocalToken, V4};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    Clock, IssueError, SessionClaims, SessionPair, SessionSettings, TokenAlgorithm, TokenCodec,
    TokenError,
};
use crate::service::SessionKeys;
use crate::utility::tracing_targets::TRACING_TARGET_SESSION_CODEC as TRACING_TARGET;
use crate::{Error, Result};

/// Wire representation of [`SessionClaims`] inside a PASETO payload.
///
/// Times use RFC 3339 strings, as registered PASETO claims do.
#[derive(Debug, Serialize, Deserialize)]
struct PasetoClaims {
    iss: String,
    aud: String,
    jti: Uuid,
    sub: String,
    iat: Timestamp,
    nbf: Timestamp,
    exp: Timestamp,
}

impl From<&SessionClaims> for PasetoClaims {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            iss: claims.issuer.clone(),
            aud: claims.audience.clone(),
            jti: claims.token_id,
            sub: claims.subject.to_string(),
            iat: claims.issued_at,
            nbf: claims.not_before,
            exp: claims.expires_at,
        }
    }
}

/// Session codec producing PASETO `v4.local` tokens.
///
/// Claims are encrypted and authenticated (XChaCha20 with a BLAKE2b MAC)
/// under a 256-bit key.
#[derive(Clone)]
pub struct PasetoCodec {
    inner: Arc<PasetoCodecInner>,
}

struct PasetoCodecInner {
    key: SymmetricKey<V4>,
    settings: SessionSettings,
    clock: Arc<dyn Clock>,
}

impl PasetoCodec {
    /// Required secret length in bytes.
    pub const SECRET_LEN: usize = 32;

    /// Creates a codec encrypting with the session secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnusableKey`] unless the secret is exactly
    /// [`Self::SECRET_LEN`] bytes long.
    pub fn new(keys: &SessionKeys, settings: SessionSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        if keys.key_size() != Self::SECRET_LEN {
            tracing::error!(
                target: TRACING_TARGET,
                key_size_bytes = keys.key_size(),
                required_key_size_bytes = Self::SECRET_LEN,
                "session secret has the wrong size for encrypted tokens",
            );
            return Err(Error::unusable_key(
                TokenAlgorithm::Paseto,
                keys.key_size(),
                format!("exactly {} bytes are required", Self::SECRET_LEN),
            ));
        }

        let key = SymmetricKey::<V4>::from(keys.secret())
            .map_err(|e| {
            Error::unusable_key(TokenAlgorithm::Paseto, keys.key_size(), e.to_string())
        })?;

        let inner = PasetoCodecInner {
            key,
            settings,
            clock,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the issuance settings.
    #[inline]
    pub fn settings(&self) -> &SessionSettings {
        &self.inner.settings
    }

    fn encrypt(&self, claims: &SessionClaims) -> Result<String, IssueError> {
        let payload =
            serde_json::to_vec(&PasetoClaims::from(claims)).map_err(IssueError::Serialize)?;

        LocalToken::encrypt(&self.inner.key, &payload, None, None).map_err(IssueError::Encrypt)
    }

    fn decrypt(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let untrusted =
            UntrustedToken::<Local, V4>::try_from(token).map_err(|_| TokenError::Malformed)?;

        let trusted = LocalToken::decrypt(&self.inner.key, &untrusted, None, None)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: PasetoClaims =
            serde_json::from_str(trusted.payload()).map_err(|_| TokenError::Malformed)?;

        let settings = &self.inner.settings;
        if claims.iss != settings.issuer || claims.aud != settings.audience {
            return Err(TokenError::BadSignature);
        }

        let subject = claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| TokenError::Malformed)?;

        Ok(SessionClaims {
            issuer: claims.iss,
            audience: claims.aud,
            token_id: claims.jti,
            subject,
            issued_at: claims.iat,
            not_before: claims.nbf,
            expires_at: claims.exp,
        })
    }
}

impl TokenCodec for PasetoCodec {
    fn algorithm(&self) -> TokenAlgorithm {
        TokenAlgorithm::Paseto
    }

    fn issue(&self, subject: AccountId) -> Result<SessionPair, IssueError> {
        let (access, refresh) = self
            .inner
            .settings
            .claims_pair(subject, self.inner.clock.now())?;

        let pair = SessionPair {
            access_token: self.encrypt(&access)?,
            refresh_token: self.encrypt(&refresh)?,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            account_id = subject,
            access_token_id = %access.token_id,
            refresh_token_id = %refresh.token_id,
            "encrypted session pair issued",
        );

        Ok(pair)
    }

    fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let claims = self.decrypt(token)?;
        claims.check_window(self.inner.clock.now())?;
        Ok(claims)
    }
}

impl fmt::Debug for PasetoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasetoCodec")
            .field("settings", &self.inner.settings)
            .field("clock", &self.inner.clock)
            .finish_non_exhaustive()
    }
}
