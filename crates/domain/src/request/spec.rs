//! Normalized request shape

use serde::{Deserialize, Serialize};

use super::{HttpMethod, KvParam};
use crate::error::{DomainError, DomainResult};

/// Content type stored for JSON bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The request definition stored inside an API setting.
///
/// The wire shape is camelCase JSON, kept as text in
/// [`ApiSetting::setting`](crate::persistence::ApiSetting::setting).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URI without the query string.
    pub uri: String,
    /// Body content type, empty when unset.
    pub content_type: String,
    /// Raw request body.
    pub body: String,
    /// Query parameters.
    pub query: Vec<KvParam>,
    /// Request headers.
    pub headers: Vec<KvParam>,
    /// Auth fields.
    pub auth: Vec<KvParam>,
}

impl HttpRequest {
    /// Creates a request with the given method and URI.
    #[must_use]
    pub fn new(method: HttpMethod, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Sets the body and its content type.
    #[must_use]
    pub fn with_body(mut self, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self.body = body.into();
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, param: KvParam) -> Self {
        self.query.push(param);
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, param: KvParam) -> Self {
        self.headers.push(param);
        self
    }

    /// Parses a request from the text stored in a setting.
    ///
    /// Empty text yields a default request.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid request document.
    pub fn from_setting_text(text: &str) -> DomainResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|e| DomainError::InvalidSetting(e.to_string()))
    }

    /// Serializes the request to the text stored in a setting.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_setting_text(&self) -> DomainResult<String> {
        serde_json::to_string(self).map_err(|e| DomainError::InvalidSetting(e.to_string()))
    }

    /// Returns a copy prepared for sending.
    ///
    /// Methods that carry no body get their body and content type cleared.
    #[must_use]
    pub fn prepared_for_send(&self) -> Self {
        let mut req = self.clone();
        if !req.method.has_body() {
            req.body.clear();
            req.content_type.clear();
        }
        req
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_setting_text_roundtrip_uses_camel_case() {
        let req = HttpRequest::new(HttpMethod::Post, "http://x.com")
            .with_body(CONTENT_TYPE_JSON, "{}")
            .with_query(KvParam::new("a", "1"));

        let text = req.to_setting_text().unwrap();
        assert!(text.contains("\"contentType\":\"application/json\""));
        assert_eq!(HttpRequest::from_setting_text(&text).unwrap(), req);
    }

    #[test]
    fn test_missing_fields_default() {
        let req = HttpRequest::from_setting_text(r#"{"method":"GET","uri":"/a"}"#).unwrap();
        assert!(req.auth.is_empty());
        assert!(req.headers.is_empty());
        assert_eq!(req.uri, "/a");
    }

    #[test]
    fn test_empty_setting_text() {
        let req = HttpRequest::from_setting_text("").unwrap();
        assert_eq!(req, HttpRequest::default());
    }

    #[test]
    fn test_prepared_for_send_clears_body_for_get() {
        let req = HttpRequest::new(HttpMethod::Get, "/a").with_body(CONTENT_TYPE_JSON, "{}");
        let prepared = req.prepared_for_send();
        assert!(prepared.body.is_empty());
        assert!(prepared.content_type.is_empty());

        let post = HttpRequest::new(HttpMethod::Post, "/a").with_body(CONTENT_TYPE_JSON, "{}");
        assert_eq!(post.prepared_for_send().body, "{}");
    }
}
