//! Error types for the paymongo-rs library.
//!
//! Every client request failure, whether the transport gave up or the API
//! answered with a non-success status, surfaces as [`ApiError`]. Webhook
//! verification has its own two variants so callers can tell a forged
//! request from a malformed one.

use crate::types::{ApiErrorEntry, ResponseEnvelope};
use serde_json::Value;
use thiserror::Error;

/// Main error type for PayMongo operations.
#[derive(Error, Debug)]
pub enum PayMongoError {
    /// The client was constructed without a secret key
    #[error("PayMongo secret key is not configured. Set PAYMONGO_SECRET_KEY in your environment.")]
    MissingSecretKey,

    /// Error returned by (or while talking to) the PayMongo API
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Webhook signature did not verify
    #[error("Invalid PayMongo webhook signature")]
    InvalidSignature,

    /// Webhook body was signed correctly but is not valid JSON
    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Error parsing URL
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// Error during JSON serialization of request attributes
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PayMongoError {
    /// Returns the API error if this is one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            PayMongoError::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for PayMongo operations.
pub type Result<T> = std::result::Result<T, PayMongoError>;

/// A failed PayMongo API call.
///
/// `status` is `None` when no response headers were obtained (connection
/// failure or timeout after all retries). `body` holds the decoded response
/// body when it was valid JSON.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: Option<u16>,
    body: Option<Value>,
}

impl ApiError {
    /// Creates an API error from its parts.
    pub fn new(message: impl Into<String>, status: Option<u16>, body: Option<Value>) -> Self {
        Self {
            message: message.into(),
            status,
            body,
        }
    }

    /// Builds the error for a non-success HTTP response.
    ///
    /// The message uses `errors[0].detail` when the body carries one and falls
    /// back to the raw body text otherwise.
    pub(crate) fn from_response(status: u16, raw: &str) -> Self {
        let body: Option<Value> = serde_json::from_str(raw).ok();
        let detail = body
            .as_ref()
            .and_then(|b| b.pointer("/errors/0/detail"))
            .and_then(Value::as_str)
            .unwrap_or(raw);

        Self {
            message: format!("PayMongo API error: {}", detail),
            status: Some(status),
            body,
        }
    }

    /// Builds the error for a request that never produced a usable response.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self {
            message: format!("PayMongo API error: {}", err),
            status: err.status().map(|s| s.as_u16()),
            body: None,
        }
    }

    /// Records the HTTP status of a response whose body could not be read.
    pub(crate) fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, if a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Decoded response body, if it was JSON.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The `code` of the first entry in `errors`, e.g. `resource_not_found`.
    pub fn error_type(&self) -> Option<&str> {
        self.body
            .as_ref()?
            .pointer("/errors/0/code")
            .and_then(Value::as_str)
    }

    /// The `detail` of the first entry in `errors`.
    pub fn error_detail(&self) -> Option<&str> {
        self.body
            .as_ref()?
            .pointer("/errors/0/detail")
            .and_then(Value::as_str)
    }

    /// All entries of the `errors` array.
    pub fn errors(&self) -> Vec<ApiErrorEntry> {
        self.body
            .as_ref()
            .and_then(|b| serde_json::from_value::<ResponseEnvelope>(b.clone()).ok())
            .and_then(|envelope| envelope.errors)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = PayMongoError::InvalidPayload("expected value".to_string());
        assert_eq!(err.to_string(), "Invalid JSON payload: expected value");

        let err = PayMongoError::InvalidSignature;
        assert_eq!(err.to_string(), "Invalid PayMongo webhook signature");
    }

    #[test]
    fn test_from_response_uses_first_detail() {
        let raw = json!({
            "errors": [
                {"code": "resource_not_found", "detail": "Not found"},
                {"code": "other", "detail": "ignored"}
            ]
        })
        .to_string();

        let err = ApiError::from_response(404, &raw);
        assert_eq!(err.message(), "PayMongo API error: Not found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.error_type(), Some("resource_not_found"));
        assert_eq!(err.error_detail(), Some("Not found"));
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn test_from_response_falls_back_to_raw_text() {
        let err = ApiError::from_response(502, "Bad Gateway");
        assert_eq!(err.message(), "PayMongo API error: Bad Gateway");
        assert!(err.body().is_none());
        assert!(err.error_type().is_none());
        assert!(err.errors().is_empty());
    }

    #[test]
    fn test_from_response_json_without_errors() {
        let err = ApiError::from_response(500, r#"{"message":"boom"}"#);
        assert_eq!(err.message(), r#"PayMongo API error: {"message":"boom"}"#);
        assert!(err.body().is_some());
        assert!(err.error_detail().is_none());
    }

    #[test]
    fn test_api_error_conversion() {
        let err: PayMongoError = ApiError::new("PayMongo API error: nope", Some(400), None).into();
        assert_eq!(err.to_string(), "PayMongo API error: nope");
        assert_eq!(err.as_api_error().and_then(ApiError::status), Some(400));
        assert!(PayMongoError::MissingSecretKey.as_api_error().is_none());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: PayMongoError = json_err.into();
        assert!(matches!(err, PayMongoError::JsonError(_)));
    }
}
