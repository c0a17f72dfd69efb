//! Entity repositories backed by native backend commands.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use courier_application::ports::{
    Backend, BackendError, DeletedItems, EntityRepository, FolderRepository,
};
use courier_domain::{ApiFolder, Entity, EntityKind, ListScope};

use crate::backend::{CMD_DELETE_API_FOLDER, CommandSet, list_args};

/// Routes every operation of one entity kind to its backend command.
pub struct CommandRepository<E> {
    backend: Arc<dyn Backend>,
    commands: CommandSet,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> CommandRepository<E> {
    /// Creates a repository invoking commands on `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            commands: CommandSet::for_kind(E::KIND),
            _entity: PhantomData,
        }
    }

    async fn send_record(&self, command: &str, entity: &E) -> Result<(), BackendError> {
        let record = serde_json::to_value(entity)?;
        self.backend
            .invoke(command, self.commands.record_args(record))
            .await?;
        Ok(())
    }
}

impl<E> std::fmt::Debug for CommandRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRepository")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for CommandRepository<E> {
    async fn create(&self, entity: &E) -> Result<(), BackendError> {
        self.send_record(self.commands.add, entity).await
    }

    async fn list(&self, scope: &ListScope) -> Result<Vec<E>, BackendError> {
        let value = self
            .backend
            .invoke(self.commands.list, list_args(E::KIND, scope))
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(E::decode_list(value)?)
    }

    async fn update(&self, entity: &E) -> Result<(), BackendError> {
        self.send_record(self.commands.update, entity).await
    }

    /// Folders are removed one at a time through the cascading command.
    async fn delete(&self, ids: &[String]) -> Result<(), BackendError> {
        if E::KIND == EntityKind::Folder {
            for id in ids {
                self.backend
                    .invoke(CMD_DELETE_API_FOLDER, json!({ "id": id }))
                    .await?;
            }
            return Ok(());
        }
        self.backend
            .invoke(self.commands.delete, json!({ "ids": ids }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl FolderRepository for CommandRepository<ApiFolder> {
    async fn delete_folder(&self, id: &str) -> Result<DeletedItems, BackendError> {
        let value = self
            .backend
            .invoke(CMD_DELETE_API_FOLDER, json!({ "id": id }))
            .await?;
        if value.is_null() {
            return Ok(DeletedItems::default());
        }
        Ok(serde_json::from_value::<DeletedItems>(value)?)
    }
}
