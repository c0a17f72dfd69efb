//! In-memory port implementations for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use courier_domain::{ApiFolder, Entity, ListScope};

use crate::ports::{
    BackendError, BaseDir, Clock, DeletedItems, EntityRepository, FilePicker, FileSystem,
    FileSystemError, FolderRepository, KeyValueStore,
};

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<(String, String), Value>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, BackendError> {
        let values = self.values.lock().map_err(BackendError::io)?;
        Ok(values.get(&(namespace.to_string(), key.to_string())).cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), BackendError> {
        let mut values = self.values.lock().map_err(BackendError::io)?;
        values.insert((namespace.to_string(), key.to_string()), value);
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Repository keeping entities in a vector. Create calls can be made to fail.
pub struct MemoryRepository<E> {
    pub items: Mutex<Vec<E>>,
    pub fail_creates: Mutex<Vec<BackendError>>,
    pub create_calls: AtomicUsize,
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            fail_creates: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
        }
    }
}

impl<E: Entity> MemoryRepository<E> {
    pub fn with_items(items: Vec<E>) -> Self {
        let repo = Self::default();
        *repo.items.lock().unwrap() = items;
        repo
    }

    pub fn snapshot(&self) -> Vec<E> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for MemoryRepository<E> {
    async fn create(&self, entity: &E) -> Result<(), BackendError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_creates.lock().unwrap().pop() {
            return Err(err);
        }
        self.items.lock().unwrap().push(entity.clone());
        Ok(())
    }

    async fn list(&self, scope: &ListScope) -> Result<Vec<E>, BackendError> {
        // Yield so concurrent callers can observe in-flight flags.
        tokio::task::yield_now().await;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|e| scope.matches(*e))
            .cloned()
            .collect())
    }

    async fn update(&self, entity: &E) -> Result<(), BackendError> {
        let mut items = self.items.lock().unwrap();
        if let Some(slot) = items.iter_mut().find(|e| e.id() == entity.id()) {
            *slot = entity.clone();
        }
        Ok(())
    }

    async fn delete(&self, ids: &[String]) -> Result<(), BackendError> {
        self.items
            .lock()
            .unwrap()
            .retain(|e| !ids.iter().any(|id| id == e.id()));
        Ok(())
    }
}

#[async_trait]
impl FolderRepository for MemoryRepository<ApiFolder> {
    async fn delete_folder(&self, id: &str) -> Result<DeletedItems, BackendError> {
        let children: Vec<String> = {
            let items = self.items.lock().unwrap();
            items
                .iter()
                .find(|f| f.id == id)
                .map(|f| f.child_ids().into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        };
        self.delete(&[id.to_string()]).await?;
        Ok(DeletedItems {
            folders: vec![id.to_string()],
            settings: children,
        })
    }
}

#[derive(Default)]
pub struct MemoryFileSystem {
    pub files: HashMap<(BaseDir, String), Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn with_file(mut self, dir: BaseDir, path: &str, content: &[u8]) -> Self {
        self.files.insert((dir, path.to_string()), content.to_vec());
        self
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn read_text(&self, path: &str, dir: BaseDir) -> Result<String, FileSystemError> {
        let bytes = self.read_binary(path, dir).await?;
        String::from_utf8(bytes).map_err(|e| {
            FileSystemError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    async fn read_binary(&self, path: &str, dir: BaseDir) -> Result<Vec<u8>, FileSystemError> {
        self.files
            .get(&(dir, path.to_string()))
            .cloned()
            .ok_or_else(|| FileSystemError::NotFound(path.into()))
    }
}

pub struct FixedPicker(pub Option<String>);

#[async_trait]
impl FilePicker for FixedPicker {
    async fn pick_file(&self, _title: &str) -> Option<String> {
        self.0.clone()
    }
}
