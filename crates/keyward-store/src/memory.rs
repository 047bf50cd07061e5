//! In-process account store.

use std::collections::HashMap;
use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::query::account::EMAIL_UNIQUE_CONSTRAINT;
use crate::{
    Account, AccountId, AccountRepository, NewAccount, StoreError, StoreResult,
    TRACING_TARGET_QUERY,
};

/// Account store backed by process memory.
///
/// Clones share the same underlying data. The email check and the insert run
/// under one write lock, so concurrent registrations of the same address
/// produce exactly one account.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: AccountId,
    accounts: HashMap<AccountId, Account>,
    by_email: HashMap<String, AccountId>,
}

impl MemoryAccountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored accounts.
    pub async fn len(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    /// Returns `true` if no accounts are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.accounts.is_empty()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait::async_trait]
impl AccountRepository for MemoryAccountStore {
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Account> {
        let inner = self.inner.read().await;
        inner
            .by_email
            .get(&email_key(email))
            .and_then(|id| inner.accounts.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_account_by_id(&self, account_id: AccountId) -> StoreResult<Account> {
        let inner = self.inner.read().await;
        inner
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_account(&self, new_account: NewAccount) -> StoreResult<Account> {
        let key = email_key(&new_account.email_address);
        let mut inner = self.inner.write().await;

        if inner.by_email.contains_key(&key) {
            tracing::debug!(
                target: TRACING_TARGET_QUERY,
                constraint = EMAIL_UNIQUE_CONSTRAINT,
                "rejected duplicate account insert"
            );
            return Err(StoreError::unique_violation(EMAIL_UNIQUE_CONSTRAINT));
        }

        inner.last_id += 1;
        let account = Account {
            id: inner.last_id,
            display_name: new_account.display_name,
            email_address: new_account.email_address,
            password_hash: new_account.password_hash,
            created_at: Timestamp::now(),
        };

        inner.by_email.insert(key, account.id);
        inner.accounts.insert(account.id, account.clone());

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            account_id = account.id,
            "account inserted"
        );

        Ok(account)
    }
}
