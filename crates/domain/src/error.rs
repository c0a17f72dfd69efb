//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The response body is not valid base64.
    #[error("invalid base64 body: {0}")]
    InvalidBase64(String),

    /// A body declared as JSON could not be parsed.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// The serialized request stored in a setting could not be read.
    #[error("invalid request setting: {0}")]
    InvalidSetting(String),

    /// The import category is not one of the known ones.
    #[error("{0} is not supported")]
    UnsupportedCategory(String),

    /// A stored record could not be decoded.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
