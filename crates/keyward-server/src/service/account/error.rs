//! Account orchestration error types.

use keyward_store::StoreError;

use crate::service::security::HashingError;
use crate::service::session::IssueError;

/// Unexpected failure of a collaborator.
///
/// Never surfaced to clients beyond a generic message.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    /// The account store failed.
    #[error("account store failure: {0}")]
    Store(#[source] StoreError),
    /// The password hasher failed.
    #[error(transparent)]
    Hashing(#[from] HashingError),
    /// Session issuance failed.
    #[error(transparent)]
    Issue(#[from] IssueError),
}

/// Failure of [`AccountService::register`].
///
/// [`AccountService::register`]: super::AccountService::register
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// An account with the email address already exists.
    #[error("account already exists")]
    AccountAlreadyExists,
    /// A collaborator failed.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Failure of [`AccountService::login`].
///
/// [`AccountService::login`]: super::AccountService::login
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// No account matches the email address.
    #[error("account not found")]
    AccountNotFound,
    /// The password does not match.
    #[error("incorrect credentials")]
    IncorrectCredentials,
    /// A collaborator failed.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Failure of [`AccountService::profile`].
///
/// [`AccountService::profile`]: super::AccountService::profile
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The account no longer exists.
    #[error("account not found")]
    AccountNotFound,
    /// A collaborator failed.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
