//! Generic entity store.
//!
//! Keeps the last fetched list of one entity kind and forwards mutations to
//! its repository. Each operation has an in-flight flag: a call made while
//! the same operation is already running on the same store returns at once
//! without doing anything.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use courier_domain::{Entity, ListScope};

use crate::error::StoreResult;
use crate::ports::{Clock, EntityRepository};

/// Marks an operation as running until dropped.
pub(crate) struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    /// Claims the flag, or returns `None` if it is already set.
    pub(crate) fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// In-flight flags of one store.
#[derive(Debug, Default)]
pub(crate) struct Flags {
    pub(crate) adding: AtomicBool,
    pub(crate) fetching: AtomicBool,
    pub(crate) updating: AtomicBool,
    pub(crate) removing: AtomicBool,
}

/// Cached list of entities over a repository.
pub struct EntityStore<E: Entity> {
    repo: Arc<dyn EntityRepository<E>>,
    clock: Arc<dyn Clock>,
    items: RwLock<Vec<E>>,
    pub(crate) flags: Flags,
}

impl<E: Entity> EntityStore<E> {
    /// Creates an empty store.
    #[must_use]
    pub fn new(repo: Arc<dyn EntityRepository<E>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            items: RwLock::new(Vec::new()),
            flags: Flags::default(),
        }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> Arc<dyn EntityRepository<E>> {
        Arc::clone(&self.repo)
    }

    /// Returns the current time of the store's clock.
    pub(crate) fn now(&self) -> courier_domain::persistence::Timestamp {
        self.clock.now()
    }

    /// Returns a snapshot of the cached items.
    pub async fn items(&self) -> Vec<E> {
        self.items.read().await.clone()
    }

    /// Returns a cached item by id.
    pub async fn find(&self, id: &str) -> Option<E> {
        self.items.read().await.iter().find(|e| e.id() == id).cloned()
    }

    /// Returns true while a fetch is running.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.flags.fetching.load(Ordering::Acquire)
    }

    /// Returns true while an update is running.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.flags.updating.load(Ordering::Acquire)
    }

    /// Reloads the cached list.
    ///
    /// While another fetch is running the current snapshot is returned.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the cache is left untouched.
    pub async fn fetch(&self, scope: &ListScope) -> StoreResult<Vec<E>> {
        let Some(_guard) = InFlight::claim(&self.flags.fetching) else {
            tracing::debug!(store = %E::KIND, "fetch already in flight");
            return Ok(self.items().await);
        };
        let items = self.repo.list(scope).await?;
        *self.items.write().await = items.clone();
        Ok(items)
    }

    /// Persists a new entity and appends it to the cache.
    ///
    /// Returns `false` when another add is running.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn add(&self, entity: E) -> StoreResult<bool> {
        let Some(_guard) = InFlight::claim(&self.flags.adding) else {
            tracing::debug!(store = %E::KIND, "add already in flight");
            return Ok(false);
        };
        self.repo.create(&entity).await?;
        self.items.write().await.push(entity);
        Ok(true)
    }

    /// Stamps and persists an entity, then replaces it in the cache.
    ///
    /// Returns `false` when another update is running.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn update(&self, mut entity: E) -> StoreResult<bool> {
        let Some(_guard) = InFlight::claim(&self.flags.updating) else {
            tracing::debug!(store = %E::KIND, "update already in flight");
            return Ok(false);
        };
        entity.touch(self.clock.now());
        self.repo.update(&entity).await?;
        self.replace_cached(entity).await;
        Ok(true)
    }

    /// Deletes entities and drops them from the cache.
    ///
    /// Returns `false` when another removal is running.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn remove(&self, ids: &[String]) -> StoreResult<bool> {
        let Some(_guard) = InFlight::claim(&self.flags.removing) else {
            tracing::debug!(store = %E::KIND, "remove already in flight");
            return Ok(false);
        };
        self.repo.delete(ids).await?;
        self.forget(ids).await;
        Ok(true)
    }

    pub(crate) async fn replace_cached(&self, entity: E) {
        let mut items = self.items.write().await;
        if let Some(slot) = items.iter_mut().find(|e| e.id() == entity.id()) {
            *slot = entity;
        }
    }

    pub(crate) async fn push_cached(&self, entity: E) {
        self.items.write().await.push(entity);
    }

    pub(crate) async fn forget(&self, ids: &[String]) {
        self.items
            .write()
            .await
            .retain(|e| !ids.iter().any(|id| id == e.id()));
    }
}

impl<E: Entity> std::fmt::Debug for EntityStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("kind", &E::KIND)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
