use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error envelope returned from the BigQuery REST API.
    #[error(transparent)]
    Response(#[from] ErrorResponse),

    /// An error from the HTTP client.
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),

    /// An error from the HTTP middleware stack.
    #[error(transparent)]
    Middleware(#[from] reqwest_middleware::Error),

    /// The response body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An error from a token source.
    #[error("token source failed: {0}")]
    TokenSource(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// HTTP status reported by the warehouse, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Response(e) => Some(e.code),
            Error::HttpClient(e) => e.status().map(|s| s.as_u16()),
            Error::Middleware(reqwest_middleware::Error::Reqwest(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// An HTTP status value, without the textual description.
    ///
    /// Example values include: `400` (Bad Request), `401` (Unauthorized), and `404` (Not Found).
    pub code: u16,

    /// Description of the error. Same as `errors.message`.
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for ErrorResponse {}

#[derive(serde::Deserialize)]
pub(crate) struct ErrorWrapper {
    pub(crate) error: ErrorResponse,
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorWrapper};

    #[test]
    fn test_decode_error_envelope() {
        let body = r#"{"error":{"code":400,"message":"Syntax error: Unexpected end of script at [1:7]","status":"INVALID_ARGUMENT","errors":[{"reason":"invalidQuery"}]}}"#;
        let wrapper: ErrorWrapper = serde_json::from_str(body).unwrap();
        let err = Error::Response(wrapper.error);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Syntax error: Unexpected end of script at [1:7]");
    }

    #[test]
    fn test_token_source_has_no_status() {
        let err = Error::TokenSource("expired".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "token source failed: expired");
    }
}
