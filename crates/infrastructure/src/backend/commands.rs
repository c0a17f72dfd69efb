//! Command names per entity kind.

use serde_json::{Map, Value, json};

use courier_domain::{EntityKind, ListScope};

/// Cascading folder delete, answering `{ folders, settings }`.
pub const CMD_DELETE_API_FOLDER: &str = "delete_api_folder";

/// The commands serving one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSet {
    /// Creates one record.
    pub add: &'static str,
    /// Lists records.
    pub list: &'static str,
    /// Replaces one record.
    pub update: &'static str,
    /// Deletes records by id.
    pub delete: &'static str,
    /// Argument name carrying the record for add and update.
    pub arg: &'static str,
}

impl CommandSet {
    /// Returns the command set of an entity kind.
    #[must_use]
    pub const fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Collection => Self {
                add: "add_api_collection",
                list: "list_api_collection",
                update: "update_api_collection",
                delete: "delete_api_collection",
                arg: "collection",
            },
            EntityKind::Folder => Self {
                add: "add_api_folder",
                list: "list_api_folder",
                update: "update_api_folder",
                delete: CMD_DELETE_API_FOLDER,
                arg: "folder",
            },
            EntityKind::Setting => Self {
                add: "add_api_setting",
                list: "list_api_setting",
                update: "update_api_setting",
                delete: "delete_api_settings",
                arg: "setting",
            },
            EntityKind::Environment => Self {
                add: "add_environment",
                list: "list_environment",
                update: "update_environment",
                delete: "delete_environment",
                arg: "env",
            },
            EntityKind::Variable => Self {
                add: "add_variable",
                list: "list_variable",
                update: "update_variable",
                delete: "delete_variable",
                arg: "value",
            },
            EntityKind::Cookie => Self {
                add: "add_cookie",
                list: "list_cookie",
                update: "add_cookie",
                delete: "delete_cookie",
                arg: "c",
            },
        }
    }

    /// Wraps a record under this set's argument name.
    #[must_use]
    pub fn record_args(&self, record: Value) -> Value {
        let mut args = Map::new();
        args.insert(self.arg.to_string(), record);
        Value::Object(args)
    }
}

/// Builds the arguments of a list command.
///
/// Collections and cookies are listed whole. Folders, settings and
/// environments are filtered by collection; variables also by category.
#[must_use]
pub fn list_args(kind: EntityKind, scope: &ListScope) -> Value {
    let collection = scope.collection.clone().unwrap_or_default();
    match kind {
        EntityKind::Collection | EntityKind::Cookie => json!({}),
        EntityKind::Folder | EntityKind::Setting | EntityKind::Environment => {
            json!({ "collection": collection })
        }
        EntityKind::Variable => json!({
            "collection": collection,
            "category": scope.category.clone().unwrap_or_default(),
        }),
    }
}
