//! Key-value store implementations.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};

use courier_application::ports::{BackendError, KeyValueStore};

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Key-value store keeping one JSON file per namespace.
///
/// ```text
/// data_dir/
///   apiFolders.json      { "fake": [ ... ] }
///   latestResponse.json  { "<request id>": [ ... ] }
/// ```
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
    write: Mutex<()>,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `root`. The directory is created on the
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write: Mutex::new(()),
        }
    }

    /// Returns the directory holding the namespace files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        let name: String = namespace
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.root.join(format!("{name}.json"))
    }

    async fn read_namespace(&self, namespace: &str) -> Result<Map<String, Value>, BackendError> {
        let path = self.namespace_path(namespace);
        match fs::read(&path).await {
            Ok(bytes) => Ok(from_json_bytes(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(BackendError::io(e)),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, BackendError> {
        let mut entries = self.read_namespace(namespace).await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), BackendError> {
        let _write = self.write.lock().await;
        let mut entries = self.read_namespace(namespace).await?;
        entries.insert(key.to_string(), value);

        let content = to_json_stable_bytes(&entries)?;
        fs::create_dir_all(&self.root).await.map_err(BackendError::io)?;
        let path = self.namespace_path(namespace);
        fs::write(&path, content).await.map_err(BackendError::io)?;
        tracing::trace!(namespace, key, path = %path.display(), "stored value");
        Ok(())
    }
}

/// In-memory key-value store, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    namespaces: RwLock<HashMap<String, Map<String, Value>>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, BackendError> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.get(namespace).and_then(|m| m.get(key)).cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), BackendError> {
        let mut namespaces = self.namespaces.write().await;
        namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(temp.path().join("data"));

        assert_eq!(store.get("apiFolders", "fake").await.unwrap(), None);
        store.set("apiFolders", "fake", json!([{"id": "1"}])).await.unwrap();
        store.set("apiFolders", "other", json!(2)).await.unwrap();

        assert_eq!(
            store.get("apiFolders", "fake").await.unwrap(),
            Some(json!([{"id": "1"}]))
        );
        let text = std::fs::read_to_string(temp.path().join("data/apiFolders.json")).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"other\": 2"));
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("cookies.json"), "not json").unwrap();
        let store = FileKeyValueStore::new(temp.path());

        let err = store.get("cookies", "fake").await.unwrap_err();
        assert_eq!(err.category, "json");
    }

    #[tokio::test]
    async fn test_namespace_names_are_sanitized() {
        let store = FileKeyValueStore::new("/data");
        assert_eq!(store.namespace_path("../x"), PathBuf::from("/data/___x.json"));
    }

    #[tokio::test]
    async fn test_memory_store_namespaces_are_separate() {
        let store = MemoryKeyValueStore::new();
        store.set("a", "k", json!(1)).await.unwrap();
        store.set("b", "k", json!(2)).await.unwrap();

        assert_eq!(store.get("a", "k").await.unwrap(), Some(json!(1)));
        assert_eq!(store.get("b", "k").await.unwrap(), Some(json!(2)));
        assert_eq!(store.get("a", "missing").await.unwrap(), None);
    }
}
