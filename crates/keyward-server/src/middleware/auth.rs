use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthHeader;

/// Requires a valid session token to proceed with the request.
///
/// The decoded [`AuthHeader`] stays cached in the request extensions, so
/// handlers behind this guard extract it without decoding again.
///
/// ```rust,ignore
/// use axum::middleware::from_fn_with_state;
/// use keyward_server::middleware::require_authentication;
///
/// let _guard = from_fn_with_state(state, require_authentication);
/// ```
pub async fn require_authentication(
    _auth_header: AuthHeader,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
