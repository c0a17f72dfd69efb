//! Entity repositories over the local key-value store.

use std::collections::{HashMap, HashSet, VecDeque};
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use courier_application::ports::{
    BackendError, DeletedItems, EntityRepository, FolderRepository, KeyValueStore,
};
use courier_domain::{ApiFolder, ApiSetting, Entity, EntityKind, ListScope};

/// Key under which each namespace keeps its entity list.
pub const LOCAL_LIST_KEY: &str = "fake";

/// Keeps all entities of one kind as a single list in the namespace named
/// after the kind's store name.
///
/// Repositories over the same store should share one write lock: a folder
/// cascade also rewrites the settings namespace.
pub struct LocalRepository<E> {
    store: Arc<dyn KeyValueStore>,
    write: Arc<Mutex<()>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> LocalRepository<E> {
    /// Creates a repository over `store` with its own write lock.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_lock(store, Arc::default())
    }

    /// Creates a repository over `store` serialized by `write`.
    #[must_use]
    pub fn with_lock(store: Arc<dyn KeyValueStore>, write: Arc<Mutex<()>>) -> Self {
        Self {
            store,
            write,
            _entity: PhantomData,
        }
    }

    async fn load(&self) -> Result<Vec<E>, BackendError> {
        load_list(self.store.as_ref(), E::KIND).await
    }

    async fn save(&self, items: &[E]) -> Result<(), BackendError> {
        save_list(self.store.as_ref(), E::KIND, items).await
    }
}

async fn load_list<E: Entity>(
    store: &dyn KeyValueStore,
    kind: EntityKind,
) -> Result<Vec<E>, BackendError> {
    match store.get(kind.store_name(), LOCAL_LIST_KEY).await? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

async fn save_list<E: Entity>(
    store: &dyn KeyValueStore,
    kind: EntityKind,
    items: &[E],
) -> Result<(), BackendError> {
    let value = serde_json::to_value(items)?;
    store.set(kind.store_name(), LOCAL_LIST_KEY, value).await
}

impl<E> std::fmt::Debug for LocalRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRepository").finish_non_exhaustive()
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for LocalRepository<E> {
    async fn create(&self, entity: &E) -> Result<(), BackendError> {
        let _write = self.write.lock().await;
        let mut items = self.load().await?;
        items.push(entity.clone());
        self.save(&items).await
    }

    async fn list(&self, scope: &ListScope) -> Result<Vec<E>, BackendError> {
        let mut items = self.load().await?;
        items.retain(|e| scope.matches(e));
        Ok(items)
    }

    /// Records that are not stored are ignored.
    async fn update(&self, entity: &E) -> Result<(), BackendError> {
        let _write = self.write.lock().await;
        let mut items = self.load().await?;
        let Some(slot) = items.iter_mut().find(|e| e.id() == entity.id()) else {
            tracing::debug!(kind = %E::KIND, id = entity.id(), "update of unknown record ignored");
            return Ok(());
        };
        *slot = entity.clone();
        self.save(&items).await
    }

    /// Folders are removed with everything below them.
    async fn delete(&self, ids: &[String]) -> Result<(), BackendError> {
        let _write = self.write.lock().await;
        if E::KIND == EntityKind::Folder {
            for id in ids {
                delete_tree(self.store.as_ref(), id).await?;
            }
            return Ok(());
        }
        let mut items = self.load().await?;
        items.retain(|e| !ids.iter().any(|id| id == e.id()));
        self.save(&items).await
    }
}

/// Walks the children of `root` breadth first. Ids naming a known folder
/// are folders, every other id is a setting. Ids seen once are skipped.
fn collect_tree(folders: &[ApiFolder], root: &str) -> DeletedItems {
    let by_id: HashMap<&str, &ApiFolder> = folders.iter().map(|f| (f.id.as_str(), f)).collect();
    let mut deleted = DeletedItems::default();
    let Some(start) = by_id.get(root) else {
        return deleted;
    };

    let mut seen = HashSet::from([root]);
    deleted.folders.push(root.to_string());
    let mut queue: VecDeque<&str> = start.child_ids().into();
    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(folder) = by_id.get(id) {
            deleted.folders.push(id.to_string());
            queue.extend(folder.child_ids());
        } else {
            deleted.settings.push(id.to_string());
        }
    }
    deleted
}

/// Removes a folder, its descendant folders and their settings. Callers
/// hold the write lock.
async fn delete_tree(store: &dyn KeyValueStore, id: &str) -> Result<DeletedItems, BackendError> {
    let folders: Vec<ApiFolder> = load_list(store, EntityKind::Folder).await?;
    let deleted = collect_tree(&folders, id);
    if deleted.folders.is_empty() {
        return Ok(deleted);
    }

    let mut settings: Vec<ApiSetting> = load_list(store, EntityKind::Setting).await?;
    settings.retain(|s| !deleted.settings.contains(&s.id));
    save_list(store, EntityKind::Setting, &settings).await?;

    let remaining: Vec<ApiFolder> = folders
        .into_iter()
        .filter(|f| !deleted.folders.contains(&f.id))
        .collect();
    save_list(store, EntityKind::Folder, &remaining).await?;
    Ok(deleted)
}

#[async_trait]
impl FolderRepository for LocalRepository<ApiFolder> {
    async fn delete_folder(&self, id: &str) -> Result<DeletedItems, BackendError> {
        let _write = self.write.lock().await;
        delete_tree(self.store.as_ref(), id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::MemoryKeyValueStore;
    use courier_domain::{Variable, VariableCategory};
    use pretty_assertions::assert_eq;

    fn repo<E: Entity>(store: &Arc<dyn KeyValueStore>) -> LocalRepository<E> {
        LocalRepository::new(Arc::clone(store))
    }

    #[tokio::test]
    async fn test_entities_live_under_constant_key() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let folders = repo::<ApiFolder>(&store);
        let folder = ApiFolder::new("c1", "f");
        folders.create(&folder).await.unwrap();

        let raw = store.get("apiFolders", LOCAL_LIST_KEY).await.unwrap().unwrap();
        assert_eq!(raw[0]["id"], folder.id.as_str());
    }

    #[tokio::test]
    async fn test_list_filters_by_scope() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let variables = repo::<Variable>(&store);
        let env = Variable::new("c1", VariableCategory::Environment, "host", "x");
        let custom = Variable::new("c1", VariableCategory::Customize, "token", "y");
        let other = Variable::new("c2", VariableCategory::Customize, "token", "z");
        for v in [&env, &custom, &other] {
            variables.create(v).await.unwrap();
        }

        let scope = ListScope::collection("c1").with_category("customize");
        let listed = variables.list(&scope).await.unwrap();
        assert_eq!(listed, vec![custom]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let folders = repo::<ApiFolder>(&store);
        let mut folder = ApiFolder::new("c1", "before");
        folders.create(&folder).await.unwrap();

        folder.name = "after".to_string();
        folders.update(&folder).await.unwrap();
        folders.update(&ApiFolder::new("c1", "ghost")).await.unwrap();
        let listed = folders.list(&ListScope::all()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "after");

        folders.delete(&[folder.id.clone()]).await.unwrap();
        assert!(folders.list(&ListScope::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generic_folder_delete_cascades() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let repos = crate::persistence::local_repositories(&store);

        let s = ApiSetting::default();
        let kept = ApiSetting::default();
        let deep = ApiSetting::default();
        let sub = ApiFolder::new("c1", "sub").with_children(&[deep.id.as_str()]);
        let f = ApiFolder::new("c1", "f").with_children(&[s.id.as_str(), sub.id.as_str()]);
        for folder in [&f, &sub] {
            repos.folders.create(folder).await.unwrap();
        }
        for setting in [&s, &kept, &deep] {
            repos.settings.create(setting).await.unwrap();
        }

        repos.folders.delete(&[f.id.clone()]).await.unwrap();

        assert!(repos.folders.list(&ListScope::all()).await.unwrap().is_empty());
        let left = repos.settings.list(&ListScope::all()).await.unwrap();
        assert_eq!(left, vec![kept]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cascade_keeps_concurrent_setting_creates() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let repos = crate::persistence::local_repositories(&store);
        let doomed = ApiSetting::default();
        let folder = ApiFolder::new("c1", "f").with_children(&[doomed.id.as_str()]);
        repos.folders.create(&folder).await.unwrap();
        repos.settings.create(&doomed).await.unwrap();

        let fresh: Vec<ApiSetting> = (0..16).map(|_| ApiSetting::default()).collect();
        let mut tasks = Vec::new();
        for setting in fresh.clone() {
            let settings = Arc::clone(&repos.settings);
            tasks.push(tokio::spawn(async move { settings.create(&setting).await }));
        }
        let folders = Arc::clone(&repos.folders);
        let folder_id = folder.id.clone();
        let cascade = tokio::spawn(async move { folders.delete_folder(&folder_id).await });

        for task in tasks {
            task.await.unwrap().unwrap();
        }
        cascade.await.unwrap().unwrap();

        let left = repos.settings.list(&ListScope::all()).await.unwrap();
        assert_eq!(left.len(), fresh.len());
        assert!(left.iter().all(|s| s.id != doomed.id));
    }

    #[test]
    fn test_collect_tree_is_breadth_first() {
        let leaf = ApiFolder::new("c1", "leaf").with_children(&["s2"]);
        let mid = ApiFolder::new("c1", "mid").with_children(&[leaf.id.as_str(), "s1"]);
        let root = ApiFolder::new("c1", "root").with_children(&[mid.id.as_str(), "s0"]);
        let folders = vec![root.clone(), mid.clone(), leaf.clone()];

        let deleted = collect_tree(&folders, &root.id);
        assert_eq!(deleted.folders, vec![root.id, mid.id, leaf.id]);
        assert_eq!(deleted.settings, vec!["s0", "s1", "s2"]);
    }

    #[test]
    fn test_collect_tree_unknown_root() {
        assert_eq!(collect_tree(&[], "missing"), DeletedItems::default());
    }

    #[test]
    fn test_collect_tree_survives_cycles() {
        let mut a = ApiFolder::new("c1", "a");
        let b = ApiFolder::new("c1", "b").with_children(&[a.id.as_str()]);
        a.set_children(&[b.id.as_str()]);

        let deleted = collect_tree(&[a.clone(), b.clone()], &a.id);
        assert_eq!(deleted.folders, vec![a.id, b.id]);
        assert!(deleted.settings.is_empty());
    }
}
