//! Repository traits implemented by account stores.

pub mod account;

pub use account::AccountRepository;
