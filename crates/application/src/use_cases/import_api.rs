//! Import use case: persists converted entities.

use std::sync::Arc;

use courier_domain::{ApiFolder, ApiSetting, Environment, ImportData};

use crate::ports::{BackendError, EntityRepository, FolderRepository};
use crate::stores::{Repositories, create_setting};

/// Output from persisting an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportApiOutput {
    /// Ids not nested in any imported folder, folders first.
    pub top_ids: Vec<String>,
    /// Number of folders written.
    pub folders: usize,
    /// Number of settings written.
    pub settings: usize,
    /// Number of environments written.
    pub environments: usize,
}

/// Use case for persisting converted import data.
///
/// Folders are written before settings, then environments. Environments
/// with neither name nor value are skipped.
pub struct ImportApi {
    folders: Arc<dyn FolderRepository>,
    settings: Arc<dyn EntityRepository<ApiSetting>>,
    environments: Arc<dyn EntityRepository<Environment>>,
}

impl ImportApi {
    /// Creates a new `ImportApi` use case.
    #[must_use]
    pub fn new(repos: &Repositories) -> Self {
        Self {
            folders: Arc::clone(&repos.folders),
            settings: Arc::clone(&repos.settings),
            environments: Arc::clone(&repos.environments),
        }
    }

    /// Persists every entity of `data`.
    ///
    /// # Errors
    ///
    /// Returns the first backend error; entities written before it stay.
    pub async fn execute(&self, mut data: ImportData) -> Result<ImportApiOutput, BackendError> {
        for folder in &data.folders {
            self.folders.create(folder).await?;
        }
        for setting in &mut data.settings {
            let original = setting.id.clone();
            create_setting(self.settings.as_ref(), setting).await?;
            if setting.id != original {
                self.relink(&mut data.folders, &original, &setting.id).await?;
            }
        }
        let mut environments = 0;
        for env in data.environments.iter().filter(|e| !e.is_blank()) {
            self.environments.create(env).await?;
            environments += 1;
        }

        let output = ImportApiOutput {
            top_ids: data.top_level_ids(),
            folders: data.folders.len(),
            settings: data.settings.len(),
            environments,
        };
        tracing::info!(
            folders = output.folders,
            settings = output.settings,
            environments = output.environments,
            "import persisted"
        );
        Ok(output)
    }

    /// Points the stored parent of a re-keyed setting at its new id.
    async fn relink(
        &self,
        folders: &mut [ApiFolder],
        old: &str,
        new: &str,
    ) -> Result<(), BackendError> {
        for folder in folders.iter_mut() {
            if folder.replace_child(old, new) {
                self.folders.update(folder).await?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ImportApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportApi").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use courier_domain::{Entity, EntityKind, ListScope};
    use pretty_assertions::assert_eq;

    use crate::ports::{CATEGORY_SEA_ORM, DeletedItems};
    use crate::testing::MemoryRepository;

    type Journal = Arc<Mutex<Vec<(EntityKind, String)>>>;

    /// Appends every create to a journal shared across entity kinds.
    struct JournalRepository<E> {
        journal: Journal,
        inner: MemoryRepository<E>,
    }

    impl<E: Entity> JournalRepository<E> {
        fn new(journal: &Journal) -> Arc<Self> {
            Arc::new(Self {
                journal: Arc::clone(journal),
                inner: MemoryRepository::default(),
            })
        }
    }

    #[async_trait]
    impl<E: Entity> EntityRepository<E> for JournalRepository<E> {
        async fn create(&self, entity: &E) -> Result<(), BackendError> {
            self.inner.create(entity).await?;
            self.journal
                .lock()
                .unwrap()
                .push((E::KIND, entity.id().to_string()));
            Ok(())
        }

        async fn list(&self, scope: &ListScope) -> Result<Vec<E>, BackendError> {
            self.inner.list(scope).await
        }

        async fn update(&self, entity: &E) -> Result<(), BackendError> {
            self.inner.update(entity).await
        }

        async fn delete(&self, ids: &[String]) -> Result<(), BackendError> {
            self.inner.delete(ids).await
        }
    }

    #[async_trait]
    impl FolderRepository for JournalRepository<ApiFolder> {
        async fn delete_folder(&self, id: &str) -> Result<DeletedItems, BackendError> {
            self.inner.delete_folder(id).await
        }
    }

    fn repositories(
        folders: Arc<dyn FolderRepository>,
        settings: Arc<dyn EntityRepository<ApiSetting>>,
        environments: Arc<dyn EntityRepository<Environment>>,
    ) -> Repositories {
        Repositories {
            collections: Arc::new(MemoryRepository::default()),
            folders,
            settings,
            environments,
            variables: Arc::new(MemoryRepository::default()),
            cookies: Arc::new(MemoryRepository::default()),
        }
    }

    #[tokio::test]
    async fn test_folders_persist_before_settings() {
        let journal = Journal::default();
        let folders = JournalRepository::<ApiFolder>::new(&journal);
        let settings = JournalRepository::<ApiSetting>::new(&journal);
        let environments = JournalRepository::<Environment>::new(&journal);
        let repos = repositories(folders.clone(), settings.clone(), environments.clone());

        let nested = ApiSetting::default();
        let loose = ApiSetting::default();
        let inner = ApiFolder::new("c1", "inner").with_children(&[nested.id.clone()]);
        let outer = ApiFolder::new("c1", "outer").with_children(&[inner.id.clone()]);
        // Settings come first in the input on purpose.
        let data = ImportData {
            settings: vec![nested, loose.clone()],
            folders: vec![outer.clone(), inner],
            environments: vec![Environment::new("host", "x"), Environment::new("", "")],
        };

        let output = ImportApi::new(&repos).execute(data).await.unwrap();
        assert_eq!(output.top_ids, vec![outer.id, loose.id]);
        assert_eq!(output.environments, 1);

        let kinds: Vec<EntityKind> = journal.lock().unwrap().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Folder,
                EntityKind::Folder,
                EntityKind::Setting,
                EntityKind::Setting,
                EntityKind::Environment,
            ]
        );
    }

    #[tokio::test]
    async fn test_retried_setting_is_relinked_in_parent() {
        let folders = Arc::new(MemoryRepository::<ApiFolder>::default());
        let settings = Arc::new(MemoryRepository::<ApiSetting>::default());
        settings.fail_creates.lock().unwrap().push(BackendError::new(
            CATEGORY_SEA_ORM,
            "UNIQUE constraint failed: api_settings.id",
        ));
        let repos = repositories(
            folders.clone(),
            settings.clone(),
            Arc::new(MemoryRepository::default()),
        );

        let nested = ApiSetting::default();
        let folder = ApiFolder::new("c1", "f").with_children(&[nested.id.clone()]);
        let data = ImportData {
            settings: vec![nested.clone()],
            folders: vec![folder.clone()],
            environments: Vec::new(),
        };

        let output = ImportApi::new(&repos).execute(data).await.unwrap();
        let stored = settings.snapshot();
        assert_eq!(stored.len(), 1);
        assert_ne!(stored[0].id, nested.id);

        let parent = &folders.snapshot()[0];
        assert_eq!(parent.child_ids(), vec![stored[0].id.as_str()]);
        assert_eq!(output.top_ids, vec![folder.id]);
    }
}
