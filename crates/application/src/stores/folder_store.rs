//! Folder store with tree edits.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use courier_domain::{ApiFolder, Entity};

use super::entity_store::{EntityStore, InFlight};
use crate::error::StoreResult;
use crate::ports::{Clock, DeletedItems, EntityRepository, FolderRepository};

/// Store for folders.
///
/// Dereferences to the generic [`EntityStore`] for list and CRUD access.
pub struct FolderStore {
    inner: EntityStore<ApiFolder>,
    repo: Arc<dyn FolderRepository>,
}

impl FolderStore {
    /// Creates an empty folder store.
    #[must_use]
    pub fn new(repo: Arc<dyn FolderRepository>, clock: Arc<dyn Clock>) -> Self {
        let base: Arc<dyn EntityRepository<ApiFolder>> = repo.clone();
        Self {
            inner: EntityStore::new(base, clock),
            repo,
        }
    }

    /// Moves `child` into folder `folder_id` at `index`, or at the end when
    /// `index` is `None` or past the end.
    ///
    /// The child is first detached from the folder currently holding it.
    /// Returns `false` when the target folder is not loaded, when the move
    /// would put a folder inside itself or its own subtree, or when another
    /// update is running.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn add_child(
        &self,
        folder_id: &str,
        child: &str,
        index: Option<usize>,
    ) -> StoreResult<bool> {
        let mut folders = self.inner.items().await;
        let Some(target) = folders.iter().position(|f| f.id == folder_id) else {
            return Ok(false);
        };
        if contains(&folders, child, folder_id) {
            tracing::warn!(folder = folder_id, child, "refusing to nest a folder in its own subtree");
            return Ok(false);
        }
        let Some(_guard) = InFlight::claim(&self.inner.flags.updating) else {
            tracing::debug!("folder update already in flight");
            return Ok(false);
        };
        let now = self.inner.now();

        if let Some(prev) = folders.iter().position(|f| f.has_child(child)) {
            let parent = &mut folders[prev];
            parent.remove_child(child);
            parent.touch(now);
            self.repo.update(parent).await?;
            self.inner.replace_cached(parent.clone()).await;
        }

        let parent = &mut folders[target];
        parent.insert_child(child, index);
        parent.touch(now);
        self.repo.update(parent).await?;
        self.inner.replace_cached(parent.clone()).await;
        Ok(true)
    }

    /// Deletes a folder and everything below it.
    ///
    /// Returns `None` when another removal is running.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn remove_tree(&self, id: &str) -> StoreResult<Option<DeletedItems>> {
        let Some(_guard) = InFlight::claim(&self.inner.flags.removing) else {
            tracing::debug!("folder remove already in flight");
            return Ok(None);
        };
        let deleted = self.repo.delete_folder(id).await?;
        self.inner.forget(&deleted.folders).await;
        tracing::info!(
            folders = deleted.folders.len(),
            settings = deleted.settings.len(),
            "deleted folder tree"
        );
        Ok(Some(deleted))
    }
}

/// Returns true if `target` is `root` or lies below it.
fn contains<'a>(folders: &'a [ApiFolder], root: &'a str, target: &str) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if !seen.insert(id) {
            continue;
        }
        if let Some(folder) = folders.iter().find(|f| f.id == id) {
            stack.extend(folder.child_ids());
        }
    }
    false
}

impl std::fmt::Debug for FolderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderStore").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl Deref for FolderStore {
    type Target = EntityStore<ApiFolder>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{FixedClock, MemoryRepository};
    use courier_domain::ListScope;
    use pretty_assertions::assert_eq;

    async fn loaded(folders: Vec<ApiFolder>) -> (Arc<MemoryRepository<ApiFolder>>, FolderStore) {
        let repo = Arc::new(MemoryRepository::with_items(folders));
        let store = FolderStore::new(repo.clone(), Arc::new(FixedClock::default()));
        store.fetch(&ListScope::all()).await.unwrap();
        (repo, store)
    }

    #[tokio::test]
    async fn test_add_child_moves_between_parents() {
        let from = ApiFolder::new("c1", "from").with_children(&["s1", "s2"]);
        let to = ApiFolder::new("c1", "to").with_children(&["s3"]);
        let (repo, store) = loaded(vec![from.clone(), to.clone()]).await;

        assert!(store.add_child(&to.id, "s1", Some(0)).await.unwrap());

        let from_now = store.find(&from.id).await.unwrap();
        let to_now = store.find(&to.id).await.unwrap();
        assert_eq!(from_now.child_ids(), vec!["s2"]);
        assert_eq!(to_now.child_ids(), vec!["s1", "s3"]);
        assert_eq!(repo.snapshot()[1].children, "s1,s3");
    }

    #[tokio::test]
    async fn test_add_child_appends_without_index() {
        let to = ApiFolder::new("c1", "to").with_children(&["a"]);
        let (_, store) = loaded(vec![to.clone()]).await;

        assert!(store.add_child(&to.id, "b", None).await.unwrap());
        assert_eq!(store.find(&to.id).await.unwrap().children, "a,b");
    }

    #[tokio::test]
    async fn test_add_child_to_unknown_folder() {
        let (_, store) = loaded(Vec::new()).await;
        assert!(!store.add_child("missing", "x", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_child_rejects_cycles() {
        let inner = ApiFolder::new("c1", "inner");
        let outer = ApiFolder::new("c1", "outer").with_children(&[inner.id.as_str()]);
        let (repo, store) = loaded(vec![outer.clone(), inner.clone()]).await;

        assert!(!store.add_child(&outer.id, &outer.id, None).await.unwrap());
        assert!(!store.add_child(&inner.id, &outer.id, None).await.unwrap());

        assert_eq!(repo.snapshot()[0].child_ids(), vec![inner.id.as_str()]);
        assert!(repo.snapshot()[1].child_ids().is_empty());
        assert!(!store.is_updating());
    }

    #[tokio::test]
    async fn test_remove_tree_forgets_folder() {
        let folder = ApiFolder::new("c1", "f").with_children(&["s1"]);
        let (_, store) = loaded(vec![folder.clone()]).await;

        let deleted = store.remove_tree(&folder.id).await.unwrap().unwrap();
        assert_eq!(deleted.folders, vec![folder.id]);
        assert_eq!(deleted.settings, vec!["s1"]);
        assert!(store.items().await.is_empty());
    }
}
