//! Custom error types for paperdash.
//!
//! This module defines all error types used throughout the library.
//! The four fetch-path kinds (`Network`, `Timeout`, `Http`, `Format`) are
//! caught at the dashboard boundary and turned into a single user-visible
//! message; the list pipeline itself never fails.

use std::time::Duration;
use thiserror::Error;

/// Main error type for paperdash operations.
#[derive(Debug, Error)]
pub enum PaperdashError {
    /// Connection-level failure (DNS, refused, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its deadline and was aborted
    #[error("Request timeout after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Upstream answered with a non-2xx status
    #[error("HTTP error {status}: {message}")]
    Http {
        /// Status code returned by the endpoint
        status: u16,
        /// Message extracted from the body, or a generic one
        message: String,
    },

    /// Response body is not the expected array of records
    #[error("Format error: {0}")]
    Format(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl PaperdashError {
    /// Whether this error came from fetching the record set.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Http { .. } | Self::Format(_)
        )
    }

    /// Message shown in place of the list when loading fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(msg) => format!("Could not reach the server: {}", msg),
            Self::Timeout(_) => "Request timeout".to_string(),
            Self::Http { message, .. } => message.clone(),
            Self::Format(msg) => format!("Unexpected response from the server: {}", msg),
            other => other.to_string(),
        }
    }
}

/// Result type alias using `PaperdashError`
pub type Result<T> = std::result::Result<T, PaperdashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kinds() {
        assert!(PaperdashError::Network("refused".into()).is_fetch_error());
        assert!(PaperdashError::Timeout(Duration::from_secs(10)).is_fetch_error());
        assert!(PaperdashError::Format("not an array".into()).is_fetch_error());
        assert!(!PaperdashError::Config("bad".into()).is_fetch_error());
    }

    #[test]
    fn test_user_message() {
        let err = PaperdashError::Http {
            status: 503,
            message: "HTTP error! status: 503".to_string(),
        };
        assert_eq!(err.user_message(), "HTTP error! status: 503");
        assert_eq!(
            PaperdashError::Timeout(Duration::from_secs(10)).user_message(),
            "Request timeout"
        );
        assert_eq!(
            PaperdashError::Timeout(Duration::from_secs(10)).to_string(),
            "Request timeout after 10s"
        );
    }
}
