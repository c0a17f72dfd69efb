//! Latest responses per request.
//!
//! Each request id keeps its most recent responses, newest first, capped at
//! [`RESPONSE_CACHE_LIMIT`]. Writes for the same id are not coordinated; the
//! last one to persist wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use courier_domain::{HttpResponse, generate_id};

use crate::ports::{BackendError, Clock, KeyValueStore};

/// Key-value namespace holding cached responses.
pub const LATEST_RESPONSE_NAMESPACE: &str = "latestResponse";

/// Responses kept per request.
pub const RESPONSE_CACHE_LIMIT: usize = 10;

/// A cached response with its capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedResponse {
    /// The response.
    pub resp: HttpResponse,
    /// When it was cached.
    pub created_at: DateTime<Utc>,
}

/// Response cache over a key-value store.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Creates a cache backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stamps the response with a fresh id and stores it at the head of
    /// its request's list, dropping the oldest entry when full.
    ///
    /// Responses without a request id get their id but are not stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn add(&self, mut resp: HttpResponse) -> Result<HttpResponse, BackendError> {
        resp.id = Some(generate_id());
        if resp.api.is_empty() {
            return Ok(resp);
        }

        let mut entries = self.list(&resp.api).await?;
        if entries.len() >= RESPONSE_CACHE_LIMIT {
            entries.truncate(RESPONSE_CACHE_LIMIT - 1);
        }
        entries.insert(
            0,
            CachedResponse {
                resp: resp.clone(),
                created_at: self.clock.now(),
            },
        );
        self.store
            .set(LATEST_RESPONSE_NAMESPACE, &resp.api, serde_json::to_value(&entries)?)
            .await?;
        tracing::debug!(api = %resp.api, count = entries.len(), "cached response");
        Ok(resp)
    }

    /// Lists cached responses for a request, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds invalid data.
    pub async fn list(&self, api: &str) -> Result<Vec<CachedResponse>, BackendError> {
        match self.store.get(LATEST_RESPONSE_NAMESPACE, api).await? {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Returns the newest cached response for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn latest(&self, api: &str) -> Result<Option<HttpResponse>, BackendError> {
        Ok(self.list(api).await?.into_iter().next().map(|entry| entry.resp))
    }

    /// Removes every cached response for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn clear(&self, api: &str) -> Result<(), BackendError> {
        if api.is_empty() {
            return Ok(());
        }
        self.store
            .set(LATEST_RESPONSE_NAMESPACE, api, Value::Array(Vec::new()))
            .await
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache").finish_non_exhaustive()
    }
}
