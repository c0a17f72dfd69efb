//! Key/value parameter types

use serde::{Deserialize, Serialize};

/// A key/value pair used for query parameters, headers and auth fields.
///
/// Supports enable/disable without deletion. Lists of these keep insertion
/// order and may hold the same key more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvParam {
    /// The parameter key
    #[serde(default)]
    pub key: String,
    /// The parameter value
    #[serde(default)]
    pub value: String,
    /// Whether this parameter is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl KvParam {
    /// Creates a new enabled parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a disabled parameter.
    #[must_use]
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: false,
        }
    }

    /// Returns true when both key and value are empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}
