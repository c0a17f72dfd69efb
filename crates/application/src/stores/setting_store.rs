//! Setting store.

use std::ops::Deref;
use std::sync::Arc;

use courier_domain::ApiSetting;

use super::entity_store::{EntityStore, InFlight};
use crate::error::StoreResult;
use crate::ports::{BackendError, Clock, EntityRepository};

/// Creates a setting, retrying once under a fresh id when the backend
/// reports a duplicate key.
///
/// # Errors
///
/// Returns the backend error of the last attempt.
pub async fn create_setting(
    repo: &dyn EntityRepository<ApiSetting>,
    setting: &mut ApiSetting,
) -> Result<(), BackendError> {
    match repo.create(setting).await {
        Err(err) if err.is_unique_violation() => {
            tracing::warn!(id = %setting.id, "duplicate setting id, retrying with a new one");
            setting.regenerate_id();
            repo.create(setting).await
        }
        other => other,
    }
}

/// Store for saved requests.
pub struct SettingStore {
    inner: EntityStore<ApiSetting>,
}

impl SettingStore {
    /// Creates an empty setting store.
    #[must_use]
    pub fn new(repo: Arc<dyn EntityRepository<ApiSetting>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: EntityStore::new(repo, clock),
        }
    }

    /// Persists a new setting and returns it as stored; its id changes if
    /// the first attempt hit a duplicate key.
    ///
    /// Returns `None` when another add is running.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn add(&self, mut setting: ApiSetting) -> StoreResult<Option<ApiSetting>> {
        let Some(_guard) = InFlight::claim(&self.inner.flags.adding) else {
            tracing::debug!("setting add already in flight");
            return Ok(None);
        };
        create_setting(self.inner.repository().as_ref(), &mut setting).await?;
        self.inner.push_cached(setting.clone()).await;
        Ok(Some(setting))
    }
}

impl std::fmt::Debug for SettingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingStore").field("inner", &self.inner).finish()
    }
}

impl Deref for SettingStore {
    type Target = EntityStore<ApiSetting>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
