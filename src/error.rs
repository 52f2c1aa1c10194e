//! Error types for instagram-insights
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for instagram-insights
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Request to {endpoint} failed with HTTP {status}: {body}")]
    RequestFailed {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Request to {endpoint} rejected credentials (HTTP {status})")]
    AuthenticationRejected { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP status returned by `endpoint`
    ///
    /// 401 and 403 map to [`Error::AuthenticationRejected`], every other
    /// status to [`Error::RequestFailed`].
    pub fn from_status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        if is_auth_status(status) {
            Self::AuthenticationRejected {
                endpoint: endpoint.into(),
                status,
            }
        } else {
            Self::RequestFailed {
                endpoint: endpoint.into(),
                status,
                body: body.into(),
            }
        }
    }

    /// Create a malformed response error
    pub fn malformed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// True when the server answered with a non-success status
    ///
    /// Covers both [`Error::RequestFailed`] and
    /// [`Error::AuthenticationRejected`].
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Error::RequestFailed { .. } | Error::AuthenticationRejected { .. }
        )
    }

    /// True when the server rejected the credential
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Error::AuthenticationRejected { .. })
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RequestFailed { status, .. } | Error::AuthenticationRejected { status, .. } => {
                Some(*status)
            }
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn is_auth_status(status: u16) -> bool {
    matches!(status, 401 | 403)
}

/// Result type alias for instagram-insights
pub type Result<T> = std::result::Result<T, Error>;
