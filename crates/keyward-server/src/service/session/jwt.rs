//! Signed-claims session tokens (JWT, HMAC-SHA2).

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use keyward_store::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    Clock, IssueError, SessionClaims, SessionPair, SessionSettings, TokenAlgorithm, TokenCodec,
    TokenError,
};
use crate::service::SessionKeys;
use crate::utility::tracing_targets::TRACING_TARGET_SESSION_CODEC as TRACING_TARGET;
use crate::{Error, Result};

/// Algorithms accepted on validation. Tokens are always signed with HS256.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Claims that must be present in every accepted token.
const REQUIRED_CLAIMS: [&str; 5] = ["iss", "aud", "sub", "exp", "nbf"];

/// Wire representation of [`SessionClaims`] inside a JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JwtClaims {
    iss: String,
    aud: String,
    jti: Uuid,
    sub: String,
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    iat: Timestamp,
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    nbf: Timestamp,
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    exp: Timestamp,
}

impl From<&SessionClaims> for JwtClaims {
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

impl TryFrom<JwtClaims> for SessionClaims {
    type Error = TokenError;

    fn try_from(claims: JwtClaims) -> Result<Self, Self::Error> {
        let subject = claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| TokenError::Malformed)?;

        Ok(Self {
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

/// Session codec producing HMAC-signed JWTs.
///
/// Tokens are signed with HS256. Validation accepts the HMAC-SHA2 family
/// only and enforces issuer and audience; time checks run against the
/// injected [`Clock`].
#[derive(Clone)]
pub struct JwtCodec {
    inner: Arc<JwtCodecInner>,
}

struct JwtCodecInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    settings: SessionSettings,
    clock: Arc<dyn Clock>,
}

impl JwtCodec {
    /// Minimum accepted secret length in bytes.
    pub const MIN_SECRET_LEN: usize = 32;

    /// Creates a codec signing with the session secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnusableKey`] if the secret is shorter than
    /// [`Self::MIN_SECRET_LEN`].
    pub fn new(keys: &SessionKeys, settings: SessionSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        if keys.key_size() < Self::MIN_SECRET_LEN {
            tracing::error!(
                target: TRACING_TARGET,
                key_size_bytes = keys.key_size(),
                min_key_size_bytes = Self::MIN_SECRET_LEN,
                "session secret is too short for signed tokens",
            );
            return Err(Error::unusable_key(
                TokenAlgorithm::Jwt,
                keys.key_size(),
                format!("at least {} bytes are required", Self::MIN_SECRET_LEN),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);

        let inner = JwtCodecInner {
            encoding_key: EncodingKey::from_secret(keys.secret()),
            decoding_key: DecodingKey::from_secret(keys.secret()),
            header: Header::new(Algorithm::HS256),
            validation,
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

    fn sign(&self, claims: &SessionClaims) -> Result<String, IssueError> {
        jsonwebtoken::encode(
            &self.inner.header,
            &JwtClaims::from(claims),
            &self.inner.encoding_key,
        )
        .map_err(IssueError::Sign)
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(
            token,
            &self.inner.decoding_key,
            &self.inner.validation,
        )
        .map_err(|e| classify(e.kind()))?;

        SessionClaims::try_from(data.claims)
    }
}

/// Maps a decoding failure onto the token error taxonomy.
fn classify(kind: &JwtErrorKind) -> TokenError {
    match kind {
        JwtErrorKind::InvalidToken
        | JwtErrorKind::Base64(_)
        | JwtErrorKind::Json(_)
        | JwtErrorKind::Utf8(_)
        | JwtErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        JwtErrorKind::ImmatureSignature => TokenError::NotYetValid,
        _ => TokenError::BadSignature,
    }
}

impl TokenCodec for JwtCodec {
    fn algorithm(&self) -> TokenAlgorithm {
        TokenAlgorithm::Jwt
    }

    fn issue(&self, subject: AccountId) -> Result<SessionPair, IssueError> {
        let (access, refresh) = self
            .inner
            .settings
            .claims_pair(subject, self.inner.clock.now())?;

        let pair = SessionPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            account_id = subject,
            access_token_id = %access.token_id,
            refresh_token_id = %refresh.token_id,
            "signed session pair issued",
        );

        Ok(pair)
    }

    fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let claims = self.verify(token)?;
        claims.check_window(self.inner.clock.now())?;
        Ok(claims)
    }
}

impl fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtCodec")
            .field("settings", &self.inner.settings)
            .field("clock", &self.inner.clock)
            .finish_non_exhaustive()
    }
}
