//! Folder record type.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::common::{Entity, EntityKind, Id, Timestamp};
use crate::id::generate_id;

/// A named node of the request tree.
///
/// `children` is the comma-joined list of child setting/folder ids; its
/// order is the display order. A child id belongs to at most one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFolder {
    /// Unique identifier.
    pub id: Id,

    /// Owning collection.
    #[serde(default)]
    pub collection: String,

    /// Comma-joined child ids.
    #[serde(default)]
    pub children: String,

    /// Human-readable folder name.
    #[serde(default)]
    pub name: String,

    /// Creation time.
    pub created_at: Timestamp,

    /// Last modification time.
    pub updated_at: Timestamp,
}

impl Default for ApiFolder {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            collection: String::new(),
            children: String::new(),
            name: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl ApiFolder {
    /// Creates a new empty folder with a fresh id.
    #[must_use]
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the ordered children.
    #[must_use]
    pub fn with_children<S: AsRef<str>>(mut self, children: &[S]) -> Self {
        self.set_children(children);
        self
    }

    /// Returns the child ids in display order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<&str> {
        self.children.split(',').filter(|id| !id.is_empty()).collect()
    }

    /// Returns true if the id is a direct child of this folder.
    #[must_use]
    pub fn has_child(&self, id: &str) -> bool {
        self.child_ids().contains(&id)
    }

    /// Replaces the children with the given ids.
    pub fn set_children<S: AsRef<str>>(&mut self, children: &[S]) {
        self.children = children
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
    }

    /// Removes a child id. Returns true if it was present.
    pub fn remove_child(&mut self, id: &str) -> bool {
        let before = self.child_ids();
        let after: Vec<&str> = before.iter().copied().filter(|c| *c != id).collect();
        if after.len() == before.len() {
            return false;
        }
        self.children = after.join(",");
        true
    }

    /// Renames a child id in place, keeping its position. Returns true if
    /// `old` was a child.
    pub fn replace_child(&mut self, old: &str, new: &str) -> bool {
        if !self.has_child(old) {
            return false;
        }
        let ids: Vec<&str> = self
            .child_ids()
            .into_iter()
            .map(|c| if c == old { new } else { c })
            .collect();
        self.children = ids.join(",");
        true
    }

    /// Inserts a child id at `index`, or appends it when `index` is `None`
    /// or past the end.
    pub fn insert_child(&mut self, id: &str, index: Option<usize>) {
        let mut ids: Vec<String> = self.child_ids().into_iter().map(String::from).collect();
        match index {
            Some(i) if i <= ids.len() => ids.insert(i, id.to_string()),
            _ => ids.push(id.to_string()),
        }
        self.children = ids.join(",");
    }
}

impl Entity for ApiFolder {
    const KIND: EntityKind = EntityKind::Folder;

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
