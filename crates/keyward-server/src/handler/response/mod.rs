//! Response types for HTTP handlers.

mod accounts;
mod authentications;
mod error_response;
mod monitors;

pub use accounts::*;
pub use authentications::*;
pub use error_response::ErrorResponse;
pub use monitors::*;
