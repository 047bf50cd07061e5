use serde::Serialize;

/// JSON body of every error response.
///
/// Borrowed from an [`Error`]; the status code travels with the response
/// itself.
///
/// [`Error`]: crate::handler::Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorResponse<'a> {
    /// Snake_case name of the error kind.
    pub name: &'static str,
    /// Sentence safe to show to the client.
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a str>,
}
