//! Backend command port
//!
//! Every persistent operation and the execution of HTTP requests goes
//! through a named command. The native backend answers commands; failures
//! come back as a categorized error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category reported by the backend's ORM layer.
pub const CATEGORY_SEA_ORM: &str = "seaOrm";

/// Command executing an HTTP request.
pub const CMD_DO_HTTP_REQUEST: &str = "do_http_request";

/// Error raised by a backend command.
///
/// Rendered as `[category]message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("[{category}]{message}")]
pub struct BackendError {
    /// Error category (`seaOrm`, `io`, `http`, ...).
    #[serde(default)]
    pub category: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl BackendError {
    /// Creates a new backend error.
    #[must_use]
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            message: message.into(),
        }
    }

    /// Creates an `io` category error.
    #[must_use]
    pub fn io(message: impl std::fmt::Display) -> Self {
        Self::new("io", message.to_string())
    }

    /// Creates a `json` category error.
    #[must_use]
    pub fn json(message: impl std::fmt::Display) -> Self {
        Self::new("json", message.to_string())
    }

    /// Creates an `http` category error.
    #[must_use]
    pub fn http(message: impl std::fmt::Display) -> Self {
        Self::new("http", message.to_string())
    }

    /// Returns true if the backend rejected a duplicate primary key.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        self.category == CATEGORY_SEA_ORM && self.message.contains("UNIQUE constraint failed")
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err)
    }
}

/// Port for invoking backend commands.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Invokes a command with JSON arguments and returns its JSON result.
    ///
    /// # Errors
    ///
    /// Returns the backend's categorized error.
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let err = BackendError::new("seaOrm", "record not found");
        assert_eq!(err.to_string(), "[seaOrm]record not found");
    }

    #[test]
    fn test_unique_violation() {
        let dup = BackendError::new(
            CATEGORY_SEA_ORM,
            "UNIQUE constraint failed: api_settings.id",
        );
        assert!(dup.is_unique_violation());
        assert!(!BackendError::new("io", "UNIQUE constraint failed").is_unique_violation());
        assert!(!BackendError::new(CATEGORY_SEA_ORM, "timeout").is_unique_violation());
    }
}
