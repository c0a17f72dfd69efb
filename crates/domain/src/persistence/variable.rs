//! Variable record type.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::common::{Entity, EntityKind, Id, Status, Timestamp};
use crate::id::generate_id;

/// Variable categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableCategory {
    /// Environment variable.
    #[serde(rename = "env")]
    Environment,
    /// User-defined value, readable through the `value` template function.
    #[serde(rename = "customize")]
    Customize,
    /// Header added to every request of a collection.
    #[serde(rename = "globalReqHeaders")]
    GlobalReqHeaders,
}

impl VariableCategory {
    /// Returns the wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "env",
            Self::Customize => "customize",
            Self::GlobalReqHeaders => "globalReqHeaders",
        }
    }
}

/// A categorized key/value pair scoped to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Unique identifier.
    pub id: Id,

    /// Variable category.
    pub category: VariableCategory,

    /// Owning collection.
    #[serde(default)]
    pub collection: String,

    /// Variable name.
    #[serde(default)]
    pub name: String,

    /// Variable value.
    #[serde(default)]
    pub value: String,

    /// Whether the variable is active.
    #[serde(default)]
    pub enabled: Status,

    /// Creation time.
    pub created_at: Timestamp,

    /// Last modification time.
    pub updated_at: Timestamp,
}

impl Variable {
    /// Creates an enabled variable with a fresh id.
    #[must_use]
    pub fn new(
        collection: impl Into<String>,
        category: VariableCategory,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            category,
            collection: collection.into(),
            name: name.into(),
            value: value.into(),
            enabled: Status::Enabled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the variable disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = Status::Disabled;
        self
    }
}

impl Entity for Variable {
    const KIND: EntityKind = EntityKind::Variable;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(&self) -> Option<&str> {
        Some(&self.collection)
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
