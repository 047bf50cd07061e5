//! Application state and dependency injection.

mod account;
mod config;
mod security;
mod session;

use std::sync::Arc;

use keyward_store::AccountRepository;

pub use crate::service::account::{
    AccountService, InternalError, LoginError, ProfileError, RegisterError,
};
pub use crate::service::config::ServiceConfig;
pub use crate::service::security::{
    HashingError, PasswordHasher, SessionKeys, SessionKeysConfig,
};
pub use crate::service::session::{
    Clock, IssueError, JwtCodec, ManualClock, PasetoCodec, SessionClaims, SessionCodec,
    SessionLifetimes, SessionPair, SessionSettings, SystemClock, TokenAlgorithm, TokenCodec,
    TokenError,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub accounts: AccountService,
    pub session_codec: SessionCodec,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Loads the session secret and builds the configured codec on the
    /// system clock.
    pub async fn new(
        service_config: ServiceConfig,
        repository: Arc<dyn AccountRepository>,
    ) -> Result<Self> {
        Self::with_clock(service_config, repository, Arc::new(SystemClock)).await
    }

    /// Initializes application state with an explicit time source.
    pub async fn with_clock(
        service_config: ServiceConfig,
        repository: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        service_config.validate()?;

        let session_keys = service_config.load_session_keys().await?;
        let session_codec = service_config.create_session_codec(&session_keys, clock)?;
        let accounts = AccountService::new(repository, PasswordHasher::new(), session_codec.clone());

        let service_state = Self {
            accounts,
            session_codec,
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(accounts: AccountService);
impl_di!(session_codec: SessionCodec);

#[cfg(test)]
mod tests {
    use keyward_store::MemoryAccountStore;

    use super::*;

    #[tokio::test]
    async fn build_state_for_each_algorithm() -> anyhow::Result<()> {
        for algorithm in [TokenAlgorithm::Jwt, TokenAlgorithm::Paseto] {
            let config = ServiceConfig::new(SessionKeysConfig::from_secret(
                "0123456789abcdef0123456789abcdef",
            ))
            .with_token_algorithm(algorithm);

            let state = ServiceState::new(config, Arc::new(MemoryAccountStore::new())).await?;
            assert_eq!(state.session_codec.algorithm(), algorithm);
        }
        Ok(())
    }

    #[tokio::test]
    async fn reject_short_paseto_secret() {
        let config = ServiceConfig::new(SessionKeysConfig::from_secret("too-short"))
            .with_token_algorithm(TokenAlgorithm::Paseto);

        let result = ServiceState::new(config, Arc::new(MemoryAccountStore::new())).await;
        assert!(result.is_err());
    }
}
