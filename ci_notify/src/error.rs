//! Error types for webhook delivery.
//!
//! Every failure is local to one destination. Callers record it in the
//! dispatch report and move on to the next recipient.

use std::fmt;

use thiserror::Error;

/// Result type alias for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Why a single webhook delivery did not happen or did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Destination is missing a usable webhook URL, or the client could not be built.
    #[error("invalid webhook configuration: {message}")]
    ConfigurationError { message: String },

    /// Webhook URL could not be parsed as an http(s) URL.
    #[error("malformed webhook URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Connection-level failure.
    #[error("network connection failed: {message}")]
    NetworkError { message: String },

    #[error("request timeout after {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },

    /// Endpoint answered with a non-2xx status.
    #[error("webhook rejected: HTTP {status_code}")]
    HttpStatus { status_code: u16, body: String },
}

impl DeliveryError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError { message: message.into() }
    }

    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into(), message: message.into() }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    pub fn http_status(status_code: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus { status_code, body: body.into() }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from(self)
    }
}

/// Coarse error class used for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Nothing was sent; the recipient's settings are unusable.
    Configuration,
    /// A request was attempted (or the URL was unusable) and failed.
    Transport,
}

impl From<&DeliveryError> for ErrorCategory {
    fn from(error: &DeliveryError) -> Self {
        match error {
            DeliveryError::ConfigurationError { .. } => Self::Configuration,
            DeliveryError::InvalidUrl { .. }
            | DeliveryError::NetworkError { .. }
            | DeliveryError::Timeout { .. }
            | DeliveryError::HttpStatus { .. } => Self::Transport,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Transport => write!(f, "transport"),
        }
    }
}
