use std::fmt;
use std::sync::Arc;

use keyward_store::{Account, AccountId, AccountRepository, NewAccount};

use super::error::{InternalError, LoginError, ProfileError, RegisterError};
use crate::service::security::PasswordHasher;
use crate::service::session::{SessionClaims, SessionCodec, SessionPair, TokenCodec, TokenError};
use crate::utility::tracing_targets::TRACING_TARGET_ACCOUNTS as TRACING_TARGET;

/// Coordinates the account store, password hasher and session codec.
///
/// The email pre-check on registration is advisory: the store's uniqueness
/// constraint decides, and a lost race still reports
/// [`RegisterError::AccountAlreadyExists`]. No operation retries.
#[derive(Clone)]
pub struct AccountService<C = SessionCodec> {
    repository: Arc<dyn AccountRepository>,
    password_hasher: PasswordHasher,
    codec: C,
}

impl<C: TokenCodec> AccountService<C> {
    /// Creates a new account service.
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        password_hasher: PasswordHasher,
        codec: C,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            codec,
        }
    }

    /// Returns the session codec.
    #[inline]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Registers a new account and returns its id.
    ///
    /// # Errors
    ///
    /// - [`RegisterError::AccountAlreadyExists`] if the email is taken, including
    ///   when a concurrent registration wins the insert.
    /// - [`RegisterError::Internal`] on any store or hashing failure.
    pub async fn register(
        &self,
        display_name: &str,
        email_address: &str,
        password: &str,
    ) -> Result<AccountId, RegisterError> {
        match self.repository.find_account_by_email(email_address).await {
            Ok(_) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "registration rejected: email already registered",
                );
                return Err(RegisterError::AccountAlreadyExists);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "account lookup failed during registration",
                );
                return Err(InternalError::Store(e).into());
            }
        }

        let password_hash = self
            .password_hasher
            .hash_password(password)
            .map_err(InternalError::from)?;

        let new_account = NewAccount::new(display_name, email_address, password_hash);
        let account = match self.repository.create_account(new_account).await {
            Ok(account) => account,
            Err(e) if e.is_unique_violation() => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    constraint = e.constraint(),
                    "registration lost a concurrent insert race",
                );
                return Err(RegisterError::AccountAlreadyExists);
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "account insert failed",
                );
                return Err(InternalError::Store(e).into());
            }
        };

        tracing::info!(
            target: TRACING_TARGET,
            account_id = account.id,
            "account registered",
        );

        Ok(account.id)
    }

    /// Authenticates with email and password and issues a session pair.
    ///
    /// # Errors
    ///
    /// - [`LoginError::AccountNotFound`] if no account matches the email.
    /// - [`LoginError::IncorrectCredentials`] if the password does not match.
    /// - [`LoginError::Internal`] on any store, hashing or issuance failure.
    pub async fn login(
        &self,
        email_address: &str,
        password: &str,
    ) -> Result<SessionPair, LoginError> {
        let account = match self.repository.find_account_by_email(email_address).await {
            Ok(account) => account,
            Err(e) if e.is_not_found() => {
                tracing::debug!(target: TRACING_TARGET, "login failed: account not found");
                return Err(LoginError::AccountNotFound);
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "account lookup failed during login",
                );
                return Err(InternalError::Store(e).into());
            }
        };

        let verified = self
            .password_hasher
            .verify_password(password, &account.password_hash)
            .map_err(InternalError::from)?;

        if !verified {
            tracing::debug!(
                target: TRACING_TARGET,
                account_id = account.id,
                "login failed: incorrect password",
            );
            return Err(LoginError::IncorrectCredentials);
        }

        let pair = self.codec.issue(account.id).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                account_id = account.id,
                error = %e,
                "session issuance failed",
            );
            InternalError::from(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            account_id = account.id,
            algorithm = %self.codec.algorithm(),
            "account logged in",
        );

        Ok(pair)
    }

    /// Returns the account with the given id.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::AccountNotFound`] if the account does not exist.
    /// - [`ProfileError::Internal`] on store failure.
    pub async fn profile(&self, account_id: AccountId) -> Result<Account, ProfileError> {
        match self.repository.find_account_by_id(account_id).await {
            Ok(account) => Ok(account),
            Err(e) if e.is_not_found() => Err(ProfileError::AccountNotFound),
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    account_id,
                    error = %e,
                    "account lookup failed",
                );
                Err(InternalError::Store(e).into())
            }
        }
    }

    /// Validates a session token.
    #[inline]
    pub fn validate_token(&self, token: &str) -> Result<(), TokenError> {
        self.codec.validate(token)
    }

    /// Validates a session token and returns its claims.
    #[inline]
    pub fn decode_token(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.codec.decode(token)
    }
}

impl<C: fmt::Debug> fmt::Debug for AccountService<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountService")
            .field("password_hasher", &self.password_hasher)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use keyward_store::{MemoryAccountStore, StoreError, StoreResult};

    use super::*;
    use crate::service::SessionKeys;
    use crate::service::session::{IssueError, SessionSettings, SystemClock, TokenAlgorithm};

    fn codec() -> anyhow::Result<SessionCodec> {
        let keys = SessionKeys::from_bytes([9u8; 32].to_vec())?;
        let settings = SessionSettings::new("keyward", "keyward:api");
        Ok(SessionCodec::new(
            TokenAlgorithm::Jwt,
            &keys,
            settings,
            Arc::new(SystemClock),
        )?)
    }

    fn service(repository: Arc<dyn AccountRepository>) -> anyhow::Result<AccountService> {
        Ok(AccountService::new(repository, PasswordHasher::new(), codec()?))
    }

    /// Store whose every call fails.
    struct UnavailableStore;

    #[async_trait::async_trait]
    impl AccountRepository for UnavailableStore {
        async fn find_account_by_email(&self, _email: &str) -> StoreResult<Account> {
            Err(StoreError::unavailable("connection refused"))
        }

        async fn find_account_by_id(&self, _account_id: AccountId) -> StoreResult<Account> {
            Err(StoreError::unavailable("connection refused"))
        }

        async fn create_account(&self, _new_account: NewAccount) -> StoreResult<Account> {
            Err(StoreError::unavailable("connection refused"))
        }
    }

    /// Store that misses the pre-check but hits the constraint on insert.
    struct RacingStore;

    #[async_trait::async_trait]
    impl AccountRepository for RacingStore {
        async fn find_account_by_email(&self, _email: &str) -> StoreResult<Account> {
            Err(StoreError::NotFound)
        }

        async fn find_account_by_id(&self, _account_id: AccountId) -> StoreResult<Account> {
            Err(StoreError::NotFound)
        }

        async fn create_account(&self, _new_account: NewAccount) -> StoreResult<Account> {
            Err(StoreError::unique_violation("accounts_email_address_key"))
        }
    }

    /// Codec whose issuance always fails.
    #[derive(Debug)]
    struct BrokenCodec;

    impl TokenCodec for BrokenCodec {
        fn algorithm(&self) -> TokenAlgorithm {
            TokenAlgorithm::Jwt
        }

        fn issue(&self, _subject: AccountId) -> Result<SessionPair, IssueError> {
            let error = serde_json::from_str::<u8>("broken").unwrap_err();
            Err(IssueError::Serialize(error))
        }

        fn decode(&self, _token: &str) -> Result<SessionClaims, TokenError> {
            Err(TokenError::Malformed)
        }
    }

    #[tokio::test]
    async fn register_then_login() -> anyhow::Result<()> {
        let service = service(Arc::new(MemoryAccountStore::new()))?;

        let id = service.register("Konu33", "norbi12@wp.pl", "Test123!").await?;
        assert_eq!(id, 1);

        let pair = service.login("norbi12@wp.pl", "Test123!").await?;
        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);

        let claims = service.decode_token(&pair.access_token)?;
        assert_eq!(claims.subject, id);
        assert_eq!(service.validate_token(&pair.refresh_token), Ok(()));
        Ok(())
    }

    #[tokio::test]
    async fn register_duplicate_email() -> anyhow::Result<()> {
        let service = service(Arc::new(MemoryAccountStore::new()))?;
        service.register("Konu33", "norbi12@wp.pl", "Test123!").await?;

        let result = service.register("Other", "norbi12@wp.pl", "Other123!").await;
        assert!(matches!(result, Err(RegisterError::AccountAlreadyExists)));
        Ok(())
    }

    #[tokio::test]
    async fn register_race_maps_to_already_exists() -> anyhow::Result<()> {
        let service = service(Arc::new(RacingStore))?;

        let result = service.register("Konu33", "norbi12@wp.pl", "Test123!").await;
        assert!(matches!(result, Err(RegisterError::AccountAlreadyExists)));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_registrations_yield_one_account() -> anyhow::Result<()> {
        let store = MemoryAccountStore::new();
        let service = service(Arc::new(store.clone()))?;

        let tasks = (0..8).map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .register(&format!("user{i}"), "race@example.com", "Test123!")
                    .await
            })
        });

        let mut successes = 0;
        for result in futures::future::join_all(tasks).await {
            match result? {
                Ok(_) => successes += 1,
                Err(RegisterError::AccountAlreadyExists) => {}
                Err(e) => anyhow::bail!("unexpected registration error: {e}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn login_failures() -> anyhow::Result<()> {
        let service = service(Arc::new(MemoryAccountStore::new()))?;
        service.register("Konu33", "norbi12@wp.pl", "Test123!").await?;

        let result = service.login("norbi12@wp.pl", "wrong").await;
        assert!(matches!(result, Err(LoginError::IncorrectCredentials)));

        let result = service.login("nobody@wp.pl", "Test123!").await;
        assert!(matches!(result, Err(LoginError::AccountNotFound)));
        Ok(())
    }

    #[tokio::test]
    async fn store_failures_are_internal() -> anyhow::Result<()> {
        let service = service(Arc::new(UnavailableStore))?;

        let result = service.register("Konu33", "norbi12@wp.pl", "Test123!").await;
        assert!(matches!(
            result,
            Err(RegisterError::Internal(InternalError::Store(_)))
        ));

        let result = service.login("norbi12@wp.pl", "Test123!").await;
        assert!(matches!(
            result,
            Err(LoginError::Internal(InternalError::Store(_)))
        ));

        let result = service.profile(1).await;
        assert!(matches!(result, Err(ProfileError::Internal(_))));
        Ok(())
    }

    #[tokio::test]
    async fn issuance_failure_is_internal() -> anyhow::Result<()> {
        let store = Arc::new(MemoryAccountStore::new());
        let working = service(store.clone())?;
        working.register("Konu33", "norbi12@wp.pl", "Test123!").await?;

        let broken = AccountService::new(store, PasswordHasher::new(), BrokenCodec);
        let result = broken.login("norbi12@wp.pl", "Test123!").await;
        assert!(matches!(
            result,
            Err(LoginError::Internal(InternalError::Issue(_)))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn profile_lookup() -> anyhow::Result<()> {
        let service = service(Arc::new(MemoryAccountStore::new()))?;
        let id = service.register("Konu33", "norbi12@wp.pl", "Test123!").await?;

        let account = service.profile(id).await?;
        assert_eq!(account.display_name, "Konu33");

        let result = service.profile(id + 1).await;
        assert!(matches!(result, Err(ProfileError::AccountNotFound)));
        Ok(())
    }
}
