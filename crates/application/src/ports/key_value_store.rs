//! Namespaced key-value store port

use async_trait::async_trait;
use serde_json::Value;

use super::BackendError;

/// Port for a namespaced key-value store holding JSON values.
///
/// Used for the response cache and for the local fallback entity store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Missing keys yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, BackendError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), BackendError>;
}
