//! Authentication response types.

use keyward_store::AccountId;
use serde::{Deserialize, Serialize};

use crate::service::SessionPair;

/// Response returned after successful registration.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registered {
    /// ID of the new account.
    pub id: AccountId,
}

/// Response returned after successful login.
#[must_use]
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    /// Access token to send as `Authorization: Bearer`.
    pub token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
}

impl From<SessionPair> for SessionTokens {
    fn from(pair: SessionPair) -> Self {
        Self {
            token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens").finish_non_exhaustive()
    }
}
