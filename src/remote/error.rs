//! Error classification for content API responses.

use std::fmt;

use serde_json::Value;

use crate::error::FolioError;

/// A failed API call, before it is turned into a `FolioError`.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if a response was received
    pub status: Option<reqwest::StatusCode>,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Build an error from a non-2xx response body.
    ///
    /// The server's JSON `message` field wins when present; otherwise the
    /// status line is used.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let server_message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .filter(|m| !m.trim().is_empty());

        let message = server_message.unwrap_or_else(|| status_line(status));
        Self {
            status: Some(status),
            message,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_some_and(|s| s.is_server_error())
    }
}

fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<ApiError> for FolioError {
    fn from(error: ApiError) -> Self {
        FolioError::network(error.status.map(|s| s.as_u16()), error.message)
    }
}
