//! Wiring of adapters, repositories and use cases.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;

use courier_application::ports::{Backend, BaseDir, Clock, KeyValueStore};
use courier_application::use_cases::SendRequest;
use courier_application::{Repositories, ResponseCache, TemplateEngine};
use courier_infrastructure::{
    ApiImporter, DirsFileSystem, FileKeyValueStore, HttpCommandBackend, PresetFilePicker,
    SystemClock, local_repositories, native_repositories,
};

use crate::config::{BackendMode, CourierConfig};

/// Everything a command needs, built once per run.
pub struct AppContext {
    backend: Option<Arc<dyn Backend>>,
    repos: Repositories,
    cache: ResponseCache,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Builds the context for the configured backend mode.
    ///
    /// The response cache always lives in the local data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the native backend cannot be set up.
    pub fn new(config: &CourierConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(&config.storage.data_dir));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

        let (backend, repos) = match config.backend.mode {
            BackendMode::Native => {
                let timeout = Duration::from_millis(config.backend.timeout_ms);
                let backend: Arc<dyn Backend> = Arc::new(
                    HttpCommandBackend::new(&config.backend.endpoint, timeout)
                        .context("invalid backend endpoint")?,
                );
                let repos = native_repositories(&backend);
                (Some(backend), repos)
            }
            BackendMode::Local => (None, local_repositories(&store)),
        };
        tracing::debug!(
            mode = ?config.backend.mode,
            data_dir = %config.storage.data_dir.display(),
            "context ready"
        );

        Ok(Self {
            backend,
            repos,
            cache: ResponseCache::new(store, Arc::clone(&clock)),
            clock,
        })
    }

    /// Creates a context over `data_dir` in local mode.
    #[cfg(test)]
    pub fn local(data_dir: &Path) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(data_dir));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        Self {
            backend: None,
            repos: local_repositories(&store),
            cache: ResponseCache::new(store, Arc::clone(&clock)),
            clock,
        }
    }

    /// Entity repositories of the configured mode.
    pub const fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// The response cache.
    pub const fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Import converter and writer.
    pub fn importer(&self) -> ApiImporter {
        ApiImporter::new(&self.repos)
    }

    /// Template engine answering file pickers from `picks`.
    pub fn engine(&self, picks: &[String], base: Option<&Path>) -> TemplateEngine {
        let mut fs = DirsFileSystem::new();
        if let Some(base) = base {
            fs = fs
                .with_base(BaseDir::Download, base)
                .with_base(BaseDir::Document, base)
                .with_base(BaseDir::Desktop, base);
        }
        TemplateEngine::new(
            Arc::new(fs),
            Arc::new(PresetFilePicker::new(picks.iter().cloned())),
            self.cache.clone(),
            Arc::clone(&self.repos.variables),
            Arc::clone(&self.clock),
        )
    }

    /// Request sender, available with the native backend only.
    ///
    /// # Errors
    ///
    /// Returns an error in local mode.
    pub fn sender(&self, picks: &[String]) -> anyhow::Result<SendRequest> {
        let backend = self
            .backend
            .clone()
            .context("sending requests needs backend.mode = \"native\"")?;
        Ok(SendRequest::new(
            backend,
            self.engine(picks, None),
            self.cache.clone(),
        ))
    }
}
