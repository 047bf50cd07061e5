//! Session token extraction from the `Authorization` header.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use keyward_store::AccountId;

use crate::handler::{Error, ErrorKind, Result};
use crate::service::{SessionClaims, SessionCodec, TokenCodec};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION as TRACING_TARGET;

/// Verified session claims taken from an `Authorization: Bearer` header.
///
/// The token is decoded with the configured [`SessionCodec`], so signature
/// (or authentication tag), issuer, audience and validity window are all
/// checked before a handler sees the claims. The result is cached in the
/// request extensions; the authentication middleware and the handler share
/// one decode.
///
/// Every rejection is a `403`.
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    claims: SessionClaims,
}

impl AuthHeader {
    /// Wraps already verified claims.
    #[inline]
    pub const fn new(claims: SessionClaims) -> Self {
        Self { claims }
    }

    /// Returns the verified claims.
    #[inline]
    pub const fn as_claims(&self) -> &SessionClaims {
        &self.claims
    }

    /// Consumes the header and returns the verified claims.
    #[inline]
    pub fn into_claims(self) -> SessionClaims {
        self.claims
    }

    /// Returns the account the token was issued to.
    #[inline]
    pub fn account_id(&self) -> AccountId {
        self.claims.subject
    }

    fn from_header(
        authorization_header: TypedHeader<Authorization<Bearer>>,
        session_codec: &SessionCodec,
    ) -> Result<Self> {
        match session_codec.decode(authorization_header.token()) {
            Ok(claims) => {
                tracing::trace!(
                    target: TRACING_TARGET,
                    account_id = claims.subject,
                    token_id = %claims.token_id,
                    "session token accepted",
                );
                Ok(Self::new(claims))
            }
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    algorithm = %session_codec.algorithm(),
                    reason = error.as_str(),
                    "session token rejected",
                );
                Err(error.into())
            }
        }
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionCodec: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let session_codec = SessionCodec::from_ref(state);

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(bearer_header) => {
                let auth_header = Self::from_header(bearer_header, &session_codec)?;
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_message("Authentication required")
                        .with_context("Missing Authorization header with Bearer token")
                        .with_resource("authentication"),
                    _ => ErrorKind::MalformedAuthToken
                        .with_message("Invalid token format")
                        .with_context("Authorization header must contain a valid Bearer token")
                        .with_resource("authentication"),
                };
                Err(error)
            }
        }
    }
}
