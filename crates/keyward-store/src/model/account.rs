//! Account model owned by the persistence layer.
//!
//! ## Models
//!
//! - [`Account`] - Stored account with identity and credential hash
//! - [`NewAccount`] - Data structure for creating new accounts

use std::fmt;

use jiff::Timestamp;

/// Numeric account identifier assigned by the store.
pub type AccountId = i64;

/// Account record as held by the store.
///
/// Accounts are immutable after creation.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,
    /// Human-readable name chosen at registration.
    pub display_name: String,
    /// Primary email used for authentication (unique, lower-cased).
    pub email_address: String,
    /// Salted one-way password hash in PHC string format.
    pub password_hash: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("email_address", &self.email_address)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Data for creating a new account.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Human-readable name chosen at registration.
    pub display_name: String,
    /// Primary email used for authentication.
    pub email_address: String,
    /// Salted one-way password hash in PHC string format.
    pub password_hash: String,
}

impl NewAccount {
    /// Creates a new account payload.
    pub fn new(
        display_name: impl Into<String>,
        email_address: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email_address: email_address.into(),
            password_hash: password_hash.into(),
        }
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("display_name", &self.display_name)
            .field("email_address", &self.email_address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password_hash() {
        let account = Account {
            id: 7,
            display_name: "Konu33".to_owned(),
            email_address: "norbi12@wp.pl".to_owned(),
            password_hash: "$argon2id$v=19$secret".to_owned(),
            created_at: Timestamp::UNIX_EPOCH,
        };

        let debug = format!("{account:?}");
        assert!(debug.contains("norbi12@wp.pl"));
        assert!(!debug.contains("argon2id"));

        let new_account = NewAccount::new("Konu33", "norbi12@wp.pl", "$argon2id$v=19$secret");
        assert!(!format!("{new_account:?}").contains("argon2id"));
    }
}
