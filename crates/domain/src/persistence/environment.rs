//! Environment record type.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::common::{Entity, EntityKind, Id, Status, Timestamp};
use crate::id::generate_id;

/// A named value substitutable into request fields, scoped to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Unique identifier.
    pub id: Id,

    /// Owning collection.
    #[serde(default)]
    pub collection: String,

    /// Environment name.
    #[serde(default)]
    pub name: String,

    /// Environment value.
    #[serde(default)]
    pub value: String,

    /// Whether the value is active.
    #[serde(default)]
    pub enabled: Status,

    /// Creation time.
    pub created_at: Timestamp,

    /// Last modification time.
    pub updated_at: Timestamp,
}

impl Environment {
    /// Creates an enabled environment value with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            collection: String::new(),
            name: name.into(),
            value: value.into(),
            enabled: Status::Enabled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the owning collection.
    #[must_use]
    pub fn in_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Returns true when both name and value are empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.value.is_empty()
    }
}

impl Entity for Environment {
    const KIND: EntityKind = EntityKind::Environment;

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
mod tests {
    use super::*;

    #[test]
    fn test_environment_new() {
        let env = Environment::new("host", "localhost").in_collection("c1");
        assert_eq!(env.collection, "c1");
        assert!(env.enabled.is_enabled());
        assert!(!env.is_blank());
        assert!(Environment::new("", "").is_blank());
    }
}
