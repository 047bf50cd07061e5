#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for account query operations.
///
/// Use this target for logging lookups, inserts, and constraint violations.
pub const TRACING_TARGET_QUERY: &str = "keyward_store::queries";

mod error;
mod memory;
pub mod model;
pub mod query;

pub use crate::error::{StoreError, StoreResult};
pub use crate::memory::MemoryAccountStore;
pub use crate::model::{Account, AccountId, NewAccount};
pub use crate::query::AccountRepository;
