//! Response record type
//!
//! The backend executes a request and reports the raw exchange: status,
//! header multimap, base64 body and timing breakdown.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::status::StatusCode;
use crate::request::HttpRequest;

/// Header multimap. Keys keep the casing reported by the backend.
pub type HeaderMap = BTreeMap<String, Vec<String>>;

/// Timing and connection details of one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpStats {
    /// Remote socket address.
    pub remote_addr: String,
    /// Whether TLS was used.
    pub is_https: bool,
    /// Negotiated cipher suite.
    pub cipher: String,
    /// DNS lookup time in ms.
    pub dns_lookup: u64,
    /// TCP connect time in ms.
    pub tcp: u64,
    /// TLS handshake time in ms.
    pub tls: u64,
    /// Request send time in ms.
    pub send: u64,
    /// Time to first byte in ms.
    pub server_processing: u64,
    /// Body download time in ms.
    pub content_transfer: u64,
    /// Total time in ms.
    pub total: u64,
}

/// A response as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpResponse {
    /// Response id, assigned when the response is cached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Id of the setting that produced this response.
    pub api: String,
    /// The request as sent.
    pub req: HttpRequest,
    /// Size of the raw body before decompression.
    pub body_size: i64,
    /// Round-trip time in ms.
    pub latency: u64,
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    #[serde(deserialize_with = "one_or_many")]
    pub headers: HeaderMap,
    /// Base64-encoded body.
    pub body: String,
    /// Timing details.
    pub stats: HttpStats,
}

impl HttpResponse {
    /// Returns all values of a header, matching the name case-insensitively.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
            .collect()
    }

    /// Appends a header value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Header values arrive either as a single string or as a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, OneOrMany>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let values = match value {
                OneOrMany::One(v) => vec![v],
                OneOrMany::Many(v) => v,
            };
            (key, values)
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "api": "s1",
            "bodySize": 7,
            "latency": 12,
            "status": 200,
            "headers": {"Content-Type": ["application/json"], "X-One": "1"},
            "body": "eyJhIjoxfQ==",
            "stats": {"remoteAddr": "127.0.0.1:80", "isHttps": false, "total": 12}
        }"#;

        let resp: HttpResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.api, "s1");
        assert_eq!(resp.status, StatusCode(200));
        assert_eq!(resp.header_values("content-type"), vec!["application/json"]);
        assert_eq!(resp.header_values("x-one"), vec!["1"]);
        assert_eq!(resp.stats.total, 12);
        assert!(resp.id.is_none());
    }

    #[test]
    fn test_header_values_across_casings() {
        let resp = HttpResponse::default()
            .with_header("Set-Cookie", "a=1")
            .with_header("set-cookie", "b=2");
        assert_eq!(resp.header_values("SET-COOKIE").len(), 2);
    }

    #[test]
    fn test_null_headers() {
        let resp: HttpResponse = serde_json::from_str(r#"{"headers": null}"#).unwrap();
        assert!(resp.headers.is_empty());
    }
}
