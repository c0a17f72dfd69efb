//! Entity repository ports
//!
//! One repository per entity kind. Implementations either route to native
//! backend commands or to the local key-value fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use courier_domain::{ApiFolder, Entity, ListScope};

use super::BackendError;

/// Ids removed by a cascading folder delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedItems {
    /// Deleted folder ids, the requested folder first.
    #[serde(default)]
    pub folders: Vec<String>,
    /// Deleted setting ids.
    #[serde(default)]
    pub settings: Vec<String>,
}

/// CRUD access to one kind of entity.
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Persists a new entity.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    async fn create(&self, entity: &E) -> Result<(), BackendError>;

    /// Lists entities within a scope.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    async fn list(&self, scope: &ListScope) -> Result<Vec<E>, BackendError>;

    /// Replaces an existing entity, matched by id.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    async fn update(&self, entity: &E) -> Result<(), BackendError>;

    /// Deletes entities by id.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    async fn delete(&self, ids: &[String]) -> Result<(), BackendError>;
}

/// Folder repository with cascading delete.
#[async_trait]
pub trait FolderRepository: EntityRepository<ApiFolder> {
    /// Deletes a folder with every folder and setting below it.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    async fn delete_folder(&self, id: &str) -> Result<DeletedItems, BackendError>;
}
