//! Application error types

use thiserror::Error;
use courier_domain::DomainError;

use crate::ports::{BackendError, FileSystemError};

/// Errors raised by entity stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend rejected the operation.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A record could not be interpreted.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The referenced entity is not loaded.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while resolving template functions.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A file function failed.
    #[error(transparent)]
    Io(#[from] FileSystemError),

    /// `get` was not given exactly a request id and a path.
    #[error("params of get from response is invalid")]
    InvalidGetParams,

    /// The cached response could not be read.
    #[error(transparent)]
    Response(#[from] DomainError),

    /// A lookup through the backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A backend command failed.
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// A store operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Template functions could not be resolved.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
