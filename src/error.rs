//! Error type for calls to the planning backend.
//!
//! Every failure the client can produce is an [`ApiError`]: transport failures,
//! non-2xx responses, bodies that fail to decode, and requests that could not be
//! built. Callers branch on [`ApiError::status`] and [`ApiError::code`] instead of
//! inspecting `reqwest` errors.

use serde_json::Value;

/// Code for failures where no HTTP response was received.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Code for non-2xx responses whose body carried no `error` field.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Code for 2xx responses whose body could not be decoded into the requested type.
pub const DECODE_ERROR: &str = "DECODE_ERROR";

/// Code for requests rejected before any network I/O.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Message used when a non-2xx response body is not valid JSON.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// A failed call to the planning backend.
///
/// `status` is the HTTP status of the response, or `0` when no response was
/// received. The value is immutable once constructed.
///
/// # Examples
///
/// ```
/// use lineplanner_client::{ApiError, error::NETWORK_ERROR};
///
/// let err = ApiError::network("connection refused");
/// assert_eq!(err.status(), 0);
/// assert_eq!(err.code(), NETWORK_ERROR);
/// assert!(err.is_network_error());
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: u16,
    code: String,
    details: Option<Value>,
}

impl ApiError {
    /// Creates an error without details.
    pub fn new(message: impl Into<String>, status: u16, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code: code.into(),
            details: None,
        }
    }

    /// Attaches structured details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// A transport failure: DNS, refused connection, or a timeout before any response.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(message, 0, NETWORK_ERROR)
    }

    /// A request that could not be built (bad endpoint, header, or body).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(message, 0, INVALID_REQUEST)
    }

    /// Builds the error for a non-2xx response from its raw body.
    ///
    /// The backend answers failures with `{ "error": CODE, "message": ..., "details": ... }`.
    /// Missing fields fall back to `UNKNOWN_ERROR` and `HTTP {status}`; a body that is
    /// not JSON at all yields [`UNKNOWN_ERROR_MESSAGE`].
    ///
    /// ```
    /// use lineplanner_client::ApiError;
    ///
    /// let err = ApiError::from_error_body(
    ///     400,
    ///     r#"{"error":"VALIDATION_ERROR","message":"Route must have at least 2 points"}"#,
    /// );
    /// assert_eq!(err.status(), 400);
    /// assert_eq!(err.code(), "VALIDATION_ERROR");
    /// assert_eq!(err.message(), "Route must have at least 2 points");
    ///
    /// let err = ApiError::from_error_body(502, "<html>Bad Gateway</html>");
    /// assert_eq!(err.message(), "Unknown error occurred");
    /// assert_eq!(err.code(), "UNKNOWN_ERROR");
    /// ```
    pub fn from_error_body(status: u16, raw_body: &str) -> Self {
        let body = match serde_json::from_str::<Value>(raw_body) {
            Ok(body) => body,
            Err(_) => return Self::new(UNKNOWN_ERROR_MESSAGE, status, UNKNOWN_ERROR),
        };

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP {}", status));
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_ERROR);

        let error = Self::new(message, status, code);
        match body.get("details") {
            Some(details) if !details.is_null() => error.with_details(details.clone()),
            _ => error,
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the response, `0` if none was received.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Machine-readable classifier.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Structured details supplied by the server, if any.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Returns `true` if no HTTP response was received.
    pub fn is_network_error(&self) -> bool {
        self.status == 0 && self.code == NETWORK_ERROR
    }

    /// Returns `true` for 4xx responses.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Returns `true` for 5xx responses.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::network(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_request(format!("Invalid URL: {}", err))
    }
}

/// A specialized `Result` type for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_with_details() {
        let body = json!({
            "error": "VALIDATION_ERROR",
            "message": "Validation error: Invalid request",
            "details": { "stations": ["At least one station is required"] },
            "code": "400"
        });

        let err = ApiError::from_error_body(400, &body.to_string());

        assert_eq!(err.status(), 400);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.message(), "Validation error: Invalid request");
        assert_eq!(
            err.details(),
            Some(&json!({ "stations": ["At least one station is required"] }))
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_error_body_missing_fields() {
        let err = ApiError::from_error_body(503, "{}");

        assert_eq!(err.message(), "HTTP 503");
        assert_eq!(err.code(), UNKNOWN_ERROR);
        assert_eq!(err.details(), None);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_body_not_json() {
        let err = ApiError::from_error_body(500, "Internal Server Error");

        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(err.code(), UNKNOWN_ERROR);
    }

    #[test]
    fn test_error_body_null_details_dropped() {
        let err = ApiError::from_error_body(404, r#"{"error":"NOT_FOUND","details":null}"#);

        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.message(), "HTTP 404");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_network_error_display() {
        let err = ApiError::network("error sending request");

        assert_eq!(err.to_string(), "error sending request");
        assert!(err.is_network_error());
        assert!(!err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_invalid_request_is_not_network_error() {
        let err = ApiError::invalid_request("Endpoint must not be empty");

        assert_eq!(err.status(), 0);
        assert_eq!(err.code(), INVALID_REQUEST);
        assert!(!err.is_network_error());
    }
}
