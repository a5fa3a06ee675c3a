//! Failures of an inference call.
//!
//! Transport failures, non-success statuses and unparseable bodies all end up
//! in the same error banner, so every variant renders a readable message that
//! carries the underlying detail.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("failed to connect to the inference endpoint. Check your internet connection.")]
    Connect,

    #[error("request timeout, the inference endpoint is not responding")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("failed to parse inference response: {0}")]
    Parse(String),

    #[error("failed to build inference request: {0}. This may be a configuration error.")]
    Request(String),

    #[error("analysis task failed: {0}")]
    Task(String),
}

impl InferenceError {
    /// Maps a non-success HTTP status to a human readable error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = match status.as_u16() {
            401 => "inference API key is invalid or expired. Please run 'rheumassist auth' to update it.".to_string(),
            403 => "you don't have permission to use this model. Check your API key and account status.".to_string(),
            429 => "too many requests to the inference endpoint. Please wait and try again.".to_string(),
            500 | 502 | 503 | 504 => format!(
                "inference endpoint is experiencing issues (status {status}): {}. Please try again later.",
                body_excerpt(body)
            ),
            _ => format!("inference endpoint error (status {status}): {}", body_excerpt(body)),
        };

        InferenceError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Longest slice of a response body carried into an error message.
const MAX_BODY_EXCERPT: usize = 200;

fn body_excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "no response body".to_string();
    }
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

impl From<reqwest::Error> for InferenceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            InferenceError::Timeout
        } else if e.is_connect() {
            InferenceError::Connect
        } else if e.is_builder() {
            InferenceError::Request(e.to_string())
        } else if e.is_decode() {
            InferenceError::Parse(e.to_string())
        } else {
            InferenceError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        let unauthorized = InferenceError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(unauthorized.to_string().contains("rheumassist auth"));

        let unavailable = InferenceError::from_status(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error":"Model is loading"}"#,
        );
        assert_eq!(
            unavailable,
            InferenceError::Status {
                status: 503,
                message: r#"inference endpoint is experiencing issues (status 503 Service Unavailable): {"error":"Model is loading"}. Please try again later."#.to_string(),
            }
        );

        let teapot = InferenceError::from_status(StatusCode::IM_A_TEAPOT, "short and stout");
        assert!(teapot.to_string().contains("short and stout"));
    }

    #[test]
    fn test_timeout_message_mentions_timeout() {
        assert!(InferenceError::Timeout.to_string().contains("timeout"));
    }

    #[test]
    fn test_server_error_body_is_truncated() {
        let body = "x".repeat(500);
        let err = InferenceError::from_status(StatusCode::BAD_GATEWAY, &body);
        let message = err.to_string();

        assert!(message.contains(&format!("{}...", "x".repeat(MAX_BODY_EXCERPT))));
        assert!(!message.contains(&"x".repeat(MAX_BODY_EXCERPT + 1)));
    }

    #[test]
    fn test_empty_body_is_named() {
        let err = InferenceError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "  ");
        assert!(err.to_string().contains("no response body"));
    }
}
