//! Account registration, login and profile lookup.

mod error;
mod service;

pub use error::{InternalError, LoginError, ProfileError, RegisterError};
pub use service::AccountService;
