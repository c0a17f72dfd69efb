//! Entity stores
//!
//! Per entity kind, a cached list plus create/list/update/delete forwarded
//! to a repository. [`Stores`] bundles one store per kind and is built once
//! at startup.

mod entity_store;
mod folder_store;
mod setting_store;

use std::sync::Arc;

use courier_domain::{ApiCollection, ApiFolder, ApiSetting, Cookie, Environment, Variable};

use crate::error::StoreResult;
use crate::ports::{Clock, DeletedItems, EntityRepository, FolderRepository};

pub use entity_store::EntityStore;
pub use folder_store::FolderStore;
pub use setting_store::{SettingStore, create_setting};

/// One repository per entity kind.
#[derive(Clone)]
pub struct Repositories {
    /// Collections.
    pub collections: Arc<dyn EntityRepository<ApiCollection>>,
    /// Folders.
    pub folders: Arc<dyn FolderRepository>,
    /// Settings.
    pub settings: Arc<dyn EntityRepository<ApiSetting>>,
    /// Environments.
    pub environments: Arc<dyn EntityRepository<Environment>>,
    /// Variables.
    pub variables: Arc<dyn EntityRepository<Variable>>,
    /// Cookies.
    pub cookies: Arc<dyn EntityRepository<Cookie>>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

/// All entity stores of the process.
#[derive(Debug)]
pub struct Stores {
    /// Collections.
    pub collections: EntityStore<ApiCollection>,
    /// Folders.
    pub folders: FolderStore,
    /// Settings.
    pub settings: SettingStore,
    /// Environments.
    pub environments: EntityStore<Environment>,
    /// Variables.
    pub variables: EntityStore<Variable>,
    /// Cookies.
    pub cookies: EntityStore<Cookie>,
}

impl Stores {
    /// Builds every store over its repository.
    #[must_use]
    pub fn new(repos: Repositories, clock: &Arc<dyn Clock>) -> Self {
        Self {
            collections: EntityStore::new(repos.collections, Arc::clone(clock)),
            folders: FolderStore::new(repos.folders, Arc::clone(clock)),
            settings: SettingStore::new(repos.settings, Arc::clone(clock)),
            environments: EntityStore::new(repos.environments, Arc::clone(clock)),
            variables: EntityStore::new(repos.variables, Arc::clone(clock)),
            cookies: EntityStore::new(repos.cookies, Arc::clone(clock)),
        }
    }

    /// Deletes a folder tree and drops the removed settings from the
    /// setting store's cache.
    ///
    /// Returns `None` when another folder removal is running.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn remove_folder(&self, id: &str) -> StoreResult<Option<DeletedItems>> {
        let deleted = self.folders.remove_tree(id).await?;
        if let Some(deleted) = &deleted {
            self.settings.forget(&deleted.settings).await;
        }
        Ok(deleted)
    }
}
