//! Backend commands over HTTP using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use courier_application::ports::{Backend, BackendError};

/// Default timeout for one command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Invokes backend commands by posting their JSON arguments to
/// `{endpoint}/{command}`.
///
/// A successful response carries the command's JSON result; an empty body
/// reads as `null`. A failed response may carry `{ category, message }`,
/// which is returned as the [`BackendError`]. Transport failures use the
/// `http` category.
#[derive(Debug, Clone)]
pub struct HttpCommandBackend {
    client: Client,
    endpoint: Url,
}

impl HttpCommandBackend {
    /// Creates a backend for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the client
    /// cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(concat!("courier/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(BackendError::http)?;
        Self::with_client(client, endpoint)
    }

    /// Creates a backend using a preconfigured client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL.
    pub fn with_client(client: Client, endpoint: &str) -> Result<Self, BackendError> {
        // Url::join replaces the last segment unless the base ends with a slash.
        let mut base = endpoint.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base).map_err(BackendError::http)?;
        Ok(Self { client, endpoint })
    }

    /// Returns the URL a command is posted to.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is not a valid path segment.
    pub fn command_url(&self, command: &str) -> Result<Url, BackendError> {
        self.endpoint.join(command).map_err(BackendError::http)
    }
}

fn decode_failure(status: reqwest::StatusCode, body: &[u8]) -> BackendError {
    match serde_json::from_slice::<BackendError>(body) {
        Ok(err) if !err.category.is_empty() || !err.message.is_empty() => err,
        _ => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() {
                BackendError::http(status)
            } else {
                BackendError::http(format!("{status}: {text}"))
            }
        }
    }
}

#[async_trait]
impl Backend for HttpCommandBackend {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BackendError> {
        let url = self.command_url(command)?;
        tracing::debug!(command, "invoking backend command");

        let response = self
            .client
            .post(url)
            .json(&args)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(command, error = %e, "backend unreachable");
                BackendError::http(e)
            })?;
        let status = response.status();
        let body = response.bytes().await.map_err(BackendError::http)?;

        if !status.is_success() {
            let err = decode_failure(status, &body);
            tracing::warn!(command, error = %err, "backend command failed");
            return Err(err);
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}
