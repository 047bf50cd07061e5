//! Conversions from service errors into HTTP errors.
//!
//! Internal failures are logged by the service layer and surface here only
//! as a generic 500.

use crate::handler::{Error, ErrorKind};
use crate::service::{HashingError, LoginError, ProfileError, RegisterError, TokenError};

impl From<RegisterError> for Error {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::AccountAlreadyExists => ErrorKind::Conflict
                .with_message("An account with this email address already exists")
                .with_resource("account"),
            RegisterError::Internal(_) => ErrorKind::InternalServerError.into_error(),
        }
    }
}

impl From<LoginError> for Error {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::AccountNotFound => ErrorKind::NotFound
                .with_message("No account is registered with this email address")
                .with_resource("account"),
            LoginError::IncorrectCredentials => ErrorKind::BadRequest
                .with_message("Incorrect email address or password")
                .with_resource("authentication"),
            LoginError::Internal(_) => ErrorKind::InternalServerError.into_error(),
        }
    }
}

impl From<ProfileError> for Error {
    fn from(error: ProfileError) -> Self {
        match error {
            ProfileError::AccountNotFound => ErrorKind::NotFound
                .with_message("The account for this session no longer exists")
                .with_resource("account"),
            ProfileError::Internal(_) => ErrorKind::InternalServerError.into_error(),
        }
    }
}

impl From<TokenError> for Error {
    fn from(error: TokenError) -> Self {
        let context = match error {
            TokenError::Malformed => "Token could not be decoded",
            TokenError::BadSignature => "Token failed the integrity check",
            TokenError::Expired => "Token has expired",
            TokenError::NotYetValid => "Token is not valid yet",
        };

        ErrorKind::Forbidden
            .with_message("Invalid session token")
            .with_context(context)
            .with_resource("authentication")
    }
}

impl From<HashingError> for Error {
    fn from(_: HashingError) -> Self {
        ErrorKind::InternalServerError.into_error()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::service::InternalError;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases: [(Error, StatusCode); 6] = [
            (RegisterError::AccountAlreadyExists.into(), StatusCode::CONFLICT),
            (LoginError::AccountNotFound.into(), StatusCode::NOT_FOUND),
            (LoginError::IncorrectCredentials.into(), StatusCode::BAD_REQUEST),
            (ProfileError::AccountNotFound.into(), StatusCode::NOT_FOUND),
            (TokenError::Expired.into(), StatusCode::FORBIDDEN),
            (
                LoginError::Internal(InternalError::Store(
                    keyward_store::StoreError::unavailable("down"),
                ))
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.kind().status_code(), status);
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let error: Error = RegisterError::Internal(InternalError::Store(
            keyward_store::StoreError::unavailable("connection to 10.0.0.5 refused"),
        ))
        .into();

        assert_eq!(error.message(), ErrorKind::InternalServerError.default_message());
        assert_eq!(error.context(), None);
        assert!(!error.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn every_token_error_is_forbidden() {
        for token_error in [
            TokenError::Malformed,
            TokenError::BadSignature,
            TokenError::Expired,
            TokenError::NotYetValid,
        ] {
            let error = Error::from(token_error);
            assert_eq!(error.kind(), ErrorKind::Forbidden);
        }
    }
}
