//! Common types shared across persistence models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// A UUID string type for stable identifiers.
pub type Id = String;

/// Timestamp type used for `created_at` / `updated_at`.
pub type Timestamp = DateTime<Utc>;

/// Enabled flag stored as `"1"` / `"0"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Enabled.
    #[default]
    #[serde(rename = "1")]
    Enabled,
    /// Disabled.
    #[serde(rename = "0")]
    Disabled,
}

impl Status {
    /// Returns true for [`Status::Enabled`].
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// The kinds of entity the stores manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// API collections (workspaces).
    Collection,
    /// Folders inside a collection.
    Folder,
    /// Saved requests.
    Setting,
    /// Environment values.
    Environment,
    /// Variables.
    Variable,
    /// Cookies.
    Cookie,
}

impl EntityKind {
    /// Returns the logical store name used by the local fallback store.
    #[must_use]
    pub const fn store_name(self) -> &'static str {
        match self {
            Self::Collection => "apiCollections",
            Self::Folder => "apiFolders",
            Self::Setting => "apiSettings",
            Self::Environment => "environments",
            Self::Variable => "variables",
            Self::Cookie => "cookies",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.store_name())
    }
}

/// Filter applied when listing entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListScope {
    /// Only entities of this collection.
    pub collection: Option<String>,
    /// Only entities of this category.
    pub category: Option<String>,
}

impl ListScope {
    /// Scope matching every entity.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            collection: None,
            category: None,
        }
    }

    /// Scope matching one collection.
    #[must_use]
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            category: None,
        }
    }

    /// Narrows the scope to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns true if the entity falls inside this scope.
    ///
    /// Entities without a collection or category ignore that part of the filter.
    #[must_use]
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        let collection_ok = match (&self.collection, entity.collection()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        };
        let category_ok = match (&self.category, entity.category()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        };
        collection_ok && category_ok
    }
}

/// A persisted record managed by an entity store.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The entity kind.
    const KIND: EntityKind;

    /// Returns the entity identifier.
    fn id(&self) -> &str;

    /// Returns the owning collection, if the entity has one.
    fn collection(&self) -> Option<&str> {
        None
    }

    /// Returns the entity category, if the entity has one.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Marks the entity as modified now.
    fn touch(&mut self, _now: Timestamp) {}

    /// Decodes the list payload returned by a backend command.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match the entity shape.
    fn decode_list(value: serde_json::Value) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_value(value)
    }
}
