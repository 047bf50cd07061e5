use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_RECOVERY_PANIC as TRACING_TARGET;

type Panic = Box<dyn Any + Send + 'static>;

/// Transforms any panic into the [`Error`] and then [`Response`].
pub fn catch_panic(err: Panic) -> Response {
    if let Some(panic) = err.downcast_ref::<String>() {
        tracing::error!(target: TRACING_TARGET, "service panic: {}", panic);
    } else if let Some(panic) = err.downcast_ref::<&str>() {
        tracing::error!(target: TRACING_TARGET, "service panic: {}", panic);
    } else if let Some(panic) = err.downcast_ref::<Error>() {
        tracing::error!(target: TRACING_TARGET, "service panic: {}", panic);
    } else {
        tracing::error!(target: TRACING_TARGET, "service panic: unknown panic type");
    }

    ErrorKind::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn panic_payloads_become_internal_error() {
        let payloads: [Panic; 3] = [
            Box::new("static str"),
            Box::new(String::from("owned")),
            Box::new(42_u8),
        ];

        for payload in payloads {
            let response = catch_panic(payload);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
