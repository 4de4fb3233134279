//! Remote persistence error types

use thiserror::Error;

use crate::models::ValidationError;

/// Errors returned by a [`ContentStore`](super::ContentStore)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Course, module, or section does not exist
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Submitted order does not match the stored items
    #[error("Invalid order submission: {reason}")]
    InvalidOrder { reason: String },

    /// Remote endpoint answered with a non-2xx status
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Connection, timeout, or other network failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Client configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Stored or seeded course failed structural validation
    #[error("Invalid course: {0}")]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    /// Create a NotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an InvalidOrder error
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            reason: reason.into(),
        }
    }

    /// Create a Rejected error
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}
