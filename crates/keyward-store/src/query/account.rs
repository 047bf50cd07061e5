//! Account repository for managing user accounts.

use crate::StoreResult;
use crate::model::{Account, AccountId, NewAccount};

/// Name of the unique constraint guarding account email addresses.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "accounts_email_address_key";

/// Repository for account persistence operations.
///
/// The store is the source of truth for email uniqueness: callers may
/// pre-check with [`find_account_by_email`], but only [`create_account`]
/// decides under concurrency.
///
/// [`find_account_by_email`]: AccountRepository::find_account_by_email
/// [`create_account`]: AccountRepository::create_account
#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by email address.
    ///
    /// Email comparison is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no account matches.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Account>;

    /// Finds an account by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no account matches.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn find_account_by_id(&self, account_id: AccountId) -> StoreResult<Account>;

    /// Inserts a new account and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] naming
    /// [`EMAIL_UNIQUE_CONSTRAINT`] when the email is already taken.
    ///
    /// [`StoreError::UniqueViolation`]: crate::StoreError::UniqueViolation
    async fn create_account(&self, new_account: NewAccount) -> StoreResult<Account>;
}
