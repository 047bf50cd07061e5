//! Session claims, lifetimes and issuance settings.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use keyward_store::AccountId;
use uuid::Uuid;

use super::error::{IssueError, TokenError};
use crate::{Error, Result};

/// Lifetimes of the two tokens of a session pair.
///
/// The refresh lifetime is never shorter than the access lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLifetimes {
    access: SignedDuration,
    refresh: SignedDuration,
}

impl SessionLifetimes {
    /// Default access token lifetime.
    pub const DEFAULT_ACCESS: SignedDuration = SignedDuration::from_hours(1);
    /// Default refresh token lifetime.
    pub const DEFAULT_REFRESH: SignedDuration = SignedDuration::from_hours(24);
    /// Longest accepted lifetime for either token (ten years).
    pub const MAX: SignedDuration = SignedDuration::from_hours(24 * 3650);

    /// Creates lifetimes for access and refresh tokens.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the access lifetime is not positive,
    /// the refresh lifetime is shorter than the access lifetime, or either
    /// exceeds [`Self::MAX`].
    pub fn new(access: SignedDuration, refresh: SignedDuration) -> Result<Self> {
        if !access.is_positive() {
            return Err(Error::config("access token lifetime must be positive"));
        }

        if refresh < access {
            return Err(Error::config(
                "refresh token lifetime must not be shorter than the access token lifetime",
            ));
        }

        if refresh > Self::MAX {
            return Err(Error::config(format!(
                "token lifetime must not exceed {} seconds",
                Self::MAX.as_secs()
            )));
        }

        Ok(Self { access, refresh })
    }

    /// Creates lifetimes from whole seconds.
    pub fn from_secs(access: u64, refresh: u64) -> Result<Self> {
        let seconds = |value: u64| {
            i64::try_from(value)
                .map(SignedDuration::from_secs)
                .map_err(|_| Error::config("token lifetime is out of range"))
        };

        Self::new(seconds(access)?, seconds(refresh)?)
    }

    /// Returns the access token lifetime.
    #[inline]
    pub const fn access(&self) -> SignedDuration {
        self.access
    }

    /// Returns the refresh token lifetime.
    #[inline]
    pub const fn refresh(&self) -> SignedDuration {
        self.refresh
    }
}

impl Default for SessionLifetimes {
    fn default() -> Self {
        Self {
            access: Self::DEFAULT_ACCESS,
            refresh: Self::DEFAULT_REFRESH,
        }
    }
}

/// Issuer, audience and lifetimes shared by every issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Value of the `iss` claim.
    pub issuer: String,
    /// Value of the `aud` claim.
    pub audience: String,
    /// Access and refresh lifetimes.
    pub lifetimes: SessionLifetimes,
}

impl SessionSettings {
    /// Creates settings with the default lifetimes.
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            lifetimes: SessionLifetimes::default(),
        }
    }

    /// Replaces the token lifetimes.
    pub fn with_lifetimes(mut self, lifetimes: SessionLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    /// Builds the access and refresh claim sets for `subject` issued at `now`.
    ///
    /// `now` is truncated to whole seconds. Both sets share issuer, audience,
    /// subject, issued-at and not-before; they differ in token id and
    /// expiration.
    pub(crate) fn claims_pair(
        &self,
        subject: AccountId,
        now: Timestamp,
    ) -> Result<(SessionClaims, SessionClaims), IssueError> {
        let issued_at = Timestamp::from_second(now.as_second()).map_err(IssueError::TimeRange)?;

        let access = self.claims(subject, issued_at, self.lifetimes.access)?;
        let refresh = self.claims(subject, issued_at, self.lifetimes.refresh)?;
        Ok((access, refresh))
    }

    fn claims(
        &self,
        subject: AccountId,
        issued_at: Timestamp,
        lifetime: SignedDuration,
    ) -> Result<SessionClaims, IssueError> {
        let expires_at = issued_at
            .checked_add(lifetime)
            .map_err(IssueError::TimeRange)?;

        Ok(SessionClaims {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            token_id: Uuid::new_v4(),
            subject,
            issued_at,
            not_before: issued_at,
            expires_at,
        })
    }
}

/// Verified claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Issuer of the token.
    pub issuer: String,
    /// Intended audience of the token.
    pub audience: String,
    /// Unique identifier of this token.
    pub token_id: Uuid,
    /// Account the token was issued to.
    pub subject: AccountId,
    /// Instant the token was issued.
    pub issued_at: Timestamp,
    /// Instant before which the token must be rejected.
    pub not_before: Timestamp,
    /// Instant from which the token must be rejected.
    pub expires_at: Timestamp,
}

impl SessionClaims {
    /// Checks the validity window against `now`.
    ///
    /// A token is valid while `not_before <= now < expires_at`.
    pub fn check_window(&self, now: Timestamp) -> Result<(), TokenError> {
        if self.expires_at <= now {
            return Err(TokenError::Expired);
        }

        if self.not_before > now {
            return Err(TokenError::NotYetValid);
        }

        Ok(())
    }

    /// Returns the total lifetime of the token.
    #[inline]
    pub fn lifetime(&self) -> SignedDuration {
        self.expires_at.duration_since(self.issued_at)
    }
}

/// Access and refresh tokens issued together on login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionPair {
    /// Short-lived token presented on every request.
    pub access_token: String,
    /// Long-lived token used to obtain new access tokens.
    pub refresh_token: String,
}

impl fmt::Debug for SessionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPair").finish_non_exhaustive()
    }
}
