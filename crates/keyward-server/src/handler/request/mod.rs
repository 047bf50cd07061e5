//! Request types for HTTP handlers.

mod authentications;
mod validations;

pub use authentications::*;
