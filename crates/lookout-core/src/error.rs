//! Error types for the Lookout application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Lookout application.
///
/// Search and scrape collaborators never surface these to their callers; they
/// log and degrade instead. The variants mostly travel out of the model backend
/// and configuration layers.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LookoutError {
    /// HTTP transport error (search endpoint, page fetch, model endpoint)
    #[error("HTTP error: {message}")]
    Http {
        status_code: Option<u16>,
        message: String,
    },

    /// The language model backend failed to produce a completion
    #[error("Model error: {0}")]
    Model(String),

    /// IO error
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LookoutError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Http error without a status code
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            status_code: None,
            message: message.into(),
        }
    }

    /// Creates an Http error carrying the response status
    pub fn http_status(status_code: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Creates a Model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Http error
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Check if this is a Model error
    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LookoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LookoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for LookoutError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, LookoutError>`.
pub type Result<T> = std::result::Result<T, LookoutError>;
