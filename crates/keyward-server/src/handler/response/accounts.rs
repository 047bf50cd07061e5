//! Account response types.

use jiff::Timestamp;
use keyward_store::{Account, AccountId};
use serde::{Deserialize, Serialize};

/// Public view of an account. Never carries the password hash.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    /// ID of the account.
    pub id: AccountId,
    /// Display name of the account.
    pub display_name: String,
    /// Email address of the account.
    pub email_address: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

impl From<Account> for AccountProfile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            display_name: account.display_name,
            email_address: account.email_address,
            created_at: account.created_at,
        }
    }
}
