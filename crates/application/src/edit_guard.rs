//! Debounced edits of the selected entity.
//!
//! Edits are committed after a quiet period. Each edit captures a ticket of
//! the selection it was made against; if the selection changed before the
//! commit runs, the edit is dropped instead of landing on the wrong entity.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use courier_domain::Entity;

use crate::stores::EntityStore;

/// Quiet period before a debounced edit is committed.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// The selection an edit was made against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTicket {
    id: String,
    generation: u64,
}

impl EditTicket {
    /// The selected id when the ticket was taken.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Tracks the selected entity with a generation counter.
#[derive(Debug, Default)]
pub struct EditGuard {
    generation: AtomicU64,
    selected: Mutex<String>,
}

impl EditGuard {
    /// Creates a guard with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the selection, invalidating outstanding tickets.
    pub fn select(&self, id: impl Into<String>) {
        let mut selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
        *selected = id.into();
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns the selected id.
    #[must_use]
    pub fn selected(&self) -> String {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Captures the current selection.
    #[must_use]
    pub fn ticket(&self) -> EditTicket {
        let selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
        EditTicket {
            id: selected.clone(),
            generation: self.generation.load(Ordering::Acquire),
        }
    }

    /// Returns true if nothing was selected since the ticket was taken.
    #[must_use]
    pub fn is_current(&self, ticket: &EditTicket) -> bool {
        let selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
        ticket.generation == self.generation.load(Ordering::Acquire) && ticket.id == *selected
    }
}

/// Runs only the last of a burst of scheduled tasks.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Runs `task` after the quiet period, cancelling the pending one.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Schedules an update of `entity` that is committed only if the
    /// selection still matches `ticket` when the quiet period ends.
    pub fn schedule_update<E: Entity>(
        &self,
        store: Arc<EntityStore<E>>,
        guard: Arc<EditGuard>,
        ticket: EditTicket,
        entity: E,
    ) {
        self.schedule(async move {
            if !guard.is_current(&ticket) {
                tracing::debug!(id = ticket.id(), "selection changed, dropping edit");
                return;
            }
            if let Err(err) = store.update(entity).await {
                tracing::error!(error = %err, "debounced update failed");
            }
        });
    }
}
