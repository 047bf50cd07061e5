use std::future::ready;

use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_RECOVERY_ERROR as TRACING_TARGET;

type ResponseFut = BoxFuture<'static, Response>;

/// Transforms any known [`tower::BoxError`] into a custom [`Error`] response.
///
/// Timeouts get a dedicated message; anything else is a generic 500 whose
/// cause is only logged.
pub fn handle_error(err: tower::BoxError) -> ResponseFut {
    use tower::timeout::error::Elapsed;

    let error = if err.is::<Elapsed>() {
        tracing::error!(
            target: TRACING_TARGET,
            error = %err,
            "request timeout exceeded",
        );

        Error::new(ErrorKind::InternalServerError)
            .with_message("Request timeout")
            .with_context("The request took too long to process and was terminated")
    } else {
        tracing::error!(
            target: TRACING_TARGET,
            error = %err,
            "unknown middleware error",
        );

        Error::new(ErrorKind::InternalServerError)
    };

    ready(error.into_response()).boxed()
}
