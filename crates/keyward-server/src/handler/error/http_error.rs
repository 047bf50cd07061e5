//! Error returned by handlers, extractors and middleware.

use std::borrow::Cow;
use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// A failed request: an [`ErrorKind`] plus what the client is told about it.
///
/// The kind alone fixes the status code and the `name` of the body. The
/// message replaces the kind's default sentence; context adds a detail line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "errors do nothing unless turned into a response"]
pub struct Error {
    kind: ErrorKind,
    resource: Option<&'static str>,
    message: Option<Cow<'static, str>>,
    context: Option<Cow<'static, str>>,
}

impl Error {
    /// Creates an error carrying only the defaults of `kind`.
    #[inline]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            resource: None,
            message: None,
            context: None,
        }
    }

    /// Names the resource the request was about (`account`, `authentication`).
    #[inline]
    pub fn with_resource(mut self, resource: &'static str) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Replaces the default message of the kind.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a detail line.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn resource(&self) -> Option<&'static str> {
        self.resource
    }

    /// Returns the message sent to the client.
    #[inline]
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Borrows the body sent to the client.
    pub fn body(&self) -> ErrorResponse<'_> {
        ErrorResponse {
            name: self.kind.into(),
            message: self.message(),
            resource: self.resource,
            context: self.context(),
        }
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.kind.status_code(), self.message())?;
        if let Some(context) = self.context() {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.kind.status_code(), Json(self.body())).into_response()
    }
}

/// A specialized [`Result`] type for handlers.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure class the HTTP surface reports.
///
/// Each authentication failure is a 403. The snake_case name of the variant
/// is the `name` field of the body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid body or wrong credentials.
    BadRequest,
    /// No bearer token was sent.
    MissingAuthToken,
    /// The `Authorization` header is not a bearer token.
    MalformedAuthToken,
    /// The bearer token was rejected by the session codec.
    Forbidden,
    NotFound,
    /// The email address is already registered.
    Conflict,
    #[default]
    InternalServerError,
}

impl ErrorKind {
    #[inline]
    pub const fn into_error(self) -> Error {
        Error::new(self)
    }

    #[inline]
    pub fn with_resource(self, resource: &'static str) -> Error {
        Error::new(self).with_resource(resource)
    }

    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_message(message)
    }

    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_context(context)
    }

    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::MissingAuthToken | Self::MalformedAuthToken | Self::Forbidden => {
                StatusCode::FORBIDDEN
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message used when the error does not carry its own.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be processed due to invalid data",
            Self::MissingAuthToken => "Authentication is required to access this resource",
            Self::MalformedAuthToken => "The authentication token format is invalid",
            Self::Forbidden => "The session token was rejected",
            Self::NotFound => "The requested resource was not found",
            Self::Conflict => "The request conflicts with an existing resource",
            Self::InternalServerError => "An internal server error occurred. Please try again later",
        }
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        Error::new(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_account_flow() {
        let table = [
            (ErrorKind::Conflict, 409, "conflict"),
            (ErrorKind::NotFound, 404, "not_found"),
            (ErrorKind::BadRequest, 400, "bad_request"),
            (ErrorKind::MissingAuthToken, 403, "missing_auth_token"),
            (ErrorKind::MalformedAuthToken, 403, "malformed_auth_token"),
            (ErrorKind::Forbidden, 403, "forbidden"),
            (ErrorKind::InternalServerError, 500, "internal_server_error"),
        ];

        for (kind, status, name) in table {
            assert_eq!(kind.status_code().as_u16(), status, "{kind:?}");
            assert_eq!(kind.to_string(), name);
        }
    }

    #[test]
    fn message_replaces_the_default() {
        let error = ErrorKind::NotFound.into_error();
        assert_eq!(error.message(), "The requested resource was not found");

        let error = error.with_message("No account is registered with this email address");
        assert_eq!(error.message(), "No account is registered with this email address");
    }

    #[test]
    fn conflict_body_names_the_account() -> anyhow::Result<()> {
        let error = ErrorKind::Conflict
            .with_message("An account with this email address already exists")
            .with_resource("account");

        let json = serde_json::to_value(error.body())?;
        assert_eq!(json["name"], "conflict");
        assert_eq!(json["resource"], "account");
        assert!(json.get("context").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn response_carries_status_and_body() -> anyhow::Result<()> {
        let response = ErrorKind::Forbidden
            .with_context("Token has expired")
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(json["name"], "forbidden");
        assert_eq!(json["context"], "Token has expired");
        Ok(())
    }
}
