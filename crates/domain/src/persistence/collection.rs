//! Collection record type.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::common::{Entity, EntityKind, Id, Timestamp};
use crate::id::generate_id;

/// Top-level grouping of folders and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCollection {
    /// Unique identifier.
    pub id: Id,

    /// Human-readable collection name.
    #[serde(default)]
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Creation time.
    pub created_at: Timestamp,

    /// Last modification time.
    pub updated_at: Timestamp,
}

impl ApiCollection {
    /// Creates a new collection with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: name.into(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the collection description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Entity for ApiCollection {
    const KIND: EntityKind = EntityKind::Collection;

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_new() {
        let collection = ApiCollection::new("My API").with_description("Public endpoints");
        assert_eq!(collection.name, "My API");
        assert_eq!(collection.description, "Public endpoints");
        assert_eq!(collection.created_at, collection.updated_at);
    }
}
