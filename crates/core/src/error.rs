//! Error types for genderize.

use thiserror::Error;

use crate::types::{NameError, NameErrorKind};

/// Result type alias using genderize's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for genderize.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Per-name Errors (raised by single-name lookups)
    // =========================================================================
    #[error("No gender data found for name: {name}")]
    NameNotFound { name: String },

    #[error("Service rejected name {name}: {message}")]
    NameRejected { name: String, message: String },

    // =========================================================================
    // Service Errors (whole chunk)
    // =========================================================================
    #[error("Result error: {0}")]
    ResultError(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Request limit reached: {0}")]
    LimitReached(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),

    // =========================================================================
    // Store Errors
    // =========================================================================
    #[error("Duplicate cache key: {0}")]
    DuplicateKey(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // =========================================================================
    // Startup Errors
    // =========================================================================
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a result error.
    pub fn result_error(msg: impl Into<String>) -> Self {
        Self::ResultError(msg.into())
    }

    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a dictionary error.
    pub fn dictionary(msg: impl Into<String>) -> Self {
        Self::Dictionary(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error stops the rest of a batch from being requested.
    ///
    /// Every service-level error does; only per-name variants do not.
    pub fn is_fatal_for_batch(&self) -> bool {
        !matches!(self, Self::NameNotFound { .. } | Self::NameRejected { .. })
    }
}

impl From<NameError> for Error {
    fn from(err: NameError) -> Self {
        let (name, kind) = err.into_parts();
        match kind {
            NameErrorKind::NotFound => Self::NameNotFound { name },
            NameErrorKind::Rejected(message) => Self::NameRejected { name, message },
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_error_converts_to_raised_variant() {
        let err: Error = NameError::not_found("ksldfjslkjfweuir").into();
        assert!(matches!(err, Error::NameNotFound { ref name } if name == "ksldfjslkjfweuir"));
        assert!(!err.is_fatal_for_batch());

        let err: Error = NameError::rejected("x", "invalid name").into();
        assert!(matches!(err, Error::NameRejected { ref message, .. } if message == "invalid name"));
    }

    #[test]
    fn test_service_errors_are_fatal() {
        assert!(Error::LimitReached("quota".into()).is_fatal_for_batch());
        assert!(Error::InvalidApiKey("bad".into()).is_fatal_for_batch());
        assert!(Error::result_error("boom").is_fatal_for_batch());
    }
}
