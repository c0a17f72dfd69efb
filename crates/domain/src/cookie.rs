//! Cookie records.
//!
//! The native backend keeps a cookie jar and reports each cookie as a
//! serialized record of the form
//! `{"raw_cookie": "name=value; ...", "path": ["/", true], "domain": {"HostOnly": "x.com"}, "expires": {"AtUtc": "..."}}`.
//! [`Cookie`] is the flattened view shown to the user.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::persistence::{Entity, EntityKind};

const DEFAULT_PATH: &str = "/";

/// A single cookie from the backend cookie jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Stable identifier derived from domain, path and name.
    #[serde(default)]
    pub id: String,
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    #[serde(default)]
    pub value: String,
    /// Path the cookie applies to.
    #[serde(default = "default_path")]
    pub path: String,
    /// Domain the cookie belongs to.
    #[serde(default)]
    pub domain: String,
    /// UTC expiry as reported by the jar; empty for session cookies.
    #[serde(default)]
    pub expires: String,
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

impl Cookie {
    /// Creates a session cookie on the root path.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        let mut cookie = Self {
            id: String::new(),
            name: name.into(),
            value: value.into(),
            path: default_path(),
            domain: domain.into(),
            expires: String::new(),
        };
        cookie.id = cookie.key();
        cookie
    }

    /// Sets the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self.id = self.key();
        self
    }

    /// Sets the expiry.
    #[must_use]
    pub fn with_expires(mut self, expires: impl Into<String>) -> Self {
        self.expires = expires.into();
        self
    }

    /// Returns true for cookies without an expiry.
    #[must_use]
    pub fn is_session(&self) -> bool {
        self.expires.is_empty()
    }

    fn key(&self) -> String {
        format!("{}{};{}", self.domain, self.path, self.name)
    }

    /// Parses one serialized jar record.
    ///
    /// Returns `None` when the record has no `raw_cookie`.
    #[must_use]
    pub fn from_jar_record(record: &Value) -> Option<Self> {
        let raw = record.get("raw_cookie").and_then(Value::as_str)?;
        if raw.is_empty() {
            return None;
        }
        let pair = raw.split(';').next().unwrap_or_default();
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));

        let path = record
            .get("path")
            .and_then(|p| p.get(0))
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PATH);

        let domain = match record.get("domain") {
            Some(Value::Object(map)) => map
                .values()
                .next()
                .and_then(Value::as_str)
                .unwrap_or_default(),
            _ => "",
        };

        let expires = record
            .get("expires")
            .and_then(|e| e.get("AtUtc"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        Some(
            Self::new(name.trim(), value.trim(), domain)
                .with_path(path)
                .with_expires(expires),
        )
    }
}

impl Entity for Cookie {
    const KIND: EntityKind = EntityKind::Cookie;

    fn id(&self) -> &str {
        &self.id
    }

    /// The jar reports a list of JSON strings, one per cookie. Already
    /// decoded objects are accepted as well; records without a raw cookie
    /// are dropped.
    fn decode_list(value: Value) -> Result<Vec<Self>, serde_json::Error> {
        let records: Vec<Value> = serde_json::from_value(value)?;
        let mut cookies = Vec::with_capacity(records.len());
        for record in records {
            let record = match record {
                Value::String(text) => serde_json::from_str(&text)?,
                other => other,
            };
            if let Some(cookie) = Self::from_jar_record(&record) {
                cookies.push(cookie);
            }
        }
        Ok(cookies)
    }
}
