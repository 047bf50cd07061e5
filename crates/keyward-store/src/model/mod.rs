//! Persistence models.

mod account;

pub use account::{Account, AccountId, NewAccount};
