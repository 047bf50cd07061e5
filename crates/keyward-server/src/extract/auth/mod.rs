//! Bearer token authentication.

mod auth_header;

pub use self::auth_header::AuthHeader;
