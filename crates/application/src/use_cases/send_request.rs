//! Send request use case.

use std::sync::Arc;

use serde_json::json;

use courier_domain::{ApiSetting, HttpRequest, HttpResponse, KvParam};

use crate::error::{ApplicationResult, TemplateError};
use crate::ports::{Backend, BackendError, CMD_DO_HTTP_REQUEST};
use crate::response_cache::ResponseCache;
use crate::template::TemplateEngine;

/// Use case for executing a saved request through the backend.
///
/// Template functions in the URI, body and enabled key/value fields are
/// resolved first. The response is stamped with the setting id and pushed
/// into the response cache.
pub struct SendRequest {
    backend: Arc<dyn Backend>,
    engine: TemplateEngine,
    cache: ResponseCache,
}

impl SendRequest {
    /// Creates a new `SendRequest` use case.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, engine: TemplateEngine, cache: ResponseCache) -> Self {
        Self {
            backend,
            engine,
            cache,
        }
    }

    /// Resolves every template in the request.
    ///
    /// # Errors
    ///
    /// Returns the first template error.
    pub async fn resolve(
        &self,
        collection: &str,
        mut req: HttpRequest,
    ) -> Result<HttpRequest, TemplateError> {
        req.uri = self.engine.resolve(collection, &req.uri).await?;
        req.body = self.engine.resolve(collection, &req.body).await?;
        for list in [&mut req.query, &mut req.headers, &mut req.auth] {
            self.resolve_params(collection, list).await?;
        }
        Ok(req)
    }

    async fn resolve_params(
        &self,
        collection: &str,
        params: &mut [KvParam],
    ) -> Result<(), TemplateError> {
        for param in params.iter_mut().filter(|p| p.enabled) {
            param.value = self.engine.resolve(collection, &param.value).await?;
        }
        Ok(())
    }

    /// Sends the request stored in `setting`.
    ///
    /// # Errors
    ///
    /// - Returns error if the stored request cannot be decoded
    /// - Returns error if a template function fails
    /// - Returns the backend error if the request fails
    pub async fn execute(&self, setting: &ApiSetting) -> ApplicationResult<HttpResponse> {
        let req = setting.request()?;
        let req = self
            .resolve(&setting.collection, req)
            .await?
            .prepared_for_send();

        tracing::info!(method = %req.method, uri = %req.uri, "sending request");
        let value = self
            .backend
            .invoke(CMD_DO_HTTP_REQUEST, json!({ "req": req }))
            .await?;
        let mut resp: HttpResponse = serde_json::from_value(value).map_err(BackendError::from)?;
        resp.api.clone_from(&setting.id);

        let resp = self.cache.add(resp).await?;
        tracing::info!(status = resp.status.as_u16(), latency = resp.latency, "request finished");
        Ok(resp)
    }
}

impl std::fmt::Debug for SendRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendRequest").finish_non_exhaustive()
    }
}
