//! Saved request record type.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::common::{Entity, EntityKind, Id, Timestamp};
use crate::error::DomainResult;
use crate::id::generate_id;
use crate::request::HttpRequest;

/// Category of settings holding an HTTP request.
pub const CATEGORY_HTTP: &str = "http";

/// A saved, named request definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSetting {
    /// Unique identifier.
    pub id: Id,

    /// Human-readable request name.
    #[serde(default)]
    pub name: String,

    /// Owning collection.
    #[serde(default)]
    pub collection: String,

    /// Folder the setting was created in, empty at the root.
    #[serde(default)]
    pub folder: String,

    /// Setting category (`http`).
    #[serde(default)]
    pub category: String,

    /// Serialized [`HttpRequest`].
    #[serde(default)]
    pub setting: String,

    /// Creation time.
    pub created_at: Timestamp,

    /// Last modification time.
    pub updated_at: Timestamp,
}

impl Default for ApiSetting {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: String::new(),
            collection: String::new(),
            folder: String::new(),
            category: String::new(),
            setting: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl ApiSetting {
    /// Creates an HTTP setting holding the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be serialized.
    pub fn http(
        collection: impl Into<String>,
        name: impl Into<String>,
        request: &HttpRequest,
    ) -> DomainResult<Self> {
        Ok(Self {
            collection: collection.into(),
            name: name.into(),
            category: CATEGORY_HTTP.to_string(),
            setting: request.to_setting_text()?,
            ..Self::default()
        })
    }

    /// Returns true if this setting holds an HTTP request.
    #[must_use]
    pub fn is_http(&self) -> bool {
        self.category == CATEGORY_HTTP
    }

    /// Decodes the stored request.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a valid request.
    pub fn request(&self) -> DomainResult<HttpRequest> {
        HttpRequest::from_setting_text(&self.setting)
    }

    /// Replaces the stored request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be serialized.
    pub fn set_request(&mut self, request: &HttpRequest) -> DomainResult<()> {
        self.setting = request.to_setting_text()?;
        Ok(())
    }

    /// Assigns a fresh identifier.
    pub fn regenerate_id(&mut self) {
        self.id = generate_id();
    }
}

impl Entity for ApiSetting {
    const KIND: EntityKind = EntityKind::Setting;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(&self) -> Option<&str> {
        Some(&self.collection)
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_http_setting_roundtrip() {
        let req = HttpRequest::new(HttpMethod::Post, "http://x.com/a");
        let setting = ApiSetting::http("col", "Create", &req).unwrap();

        assert!(setting.is_http());
        assert_eq!(setting.collection, "col");
        assert_eq!(setting.request().unwrap(), req);
    }

    #[test]
    fn test_regenerate_id() {
        let mut setting = ApiSetting::default();
        let old = setting.id.clone();
        setting.regenerate_id();
        assert_ne!(old, setting.id);
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{
            "id": "01",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let setting: ApiSetting = serde_json::from_str(json).unwrap();
        assert_eq!(setting.id, "01");
        assert!(setting.folder.is_empty());
    }
}
