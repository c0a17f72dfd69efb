//! Persisted entity records.
//!
//! Each record kind is handled by one entity store. Records are closed
//! structs; the wire shape is camelCase JSON as exchanged with the backend.

mod collection;
mod common;
mod environment;
mod folder;
mod setting;
mod variable;

pub use collection::ApiCollection;
pub use common::{Entity, EntityKind, Id, ListScope, Status, Timestamp};
pub use environment::Environment;
pub use folder::ApiFolder;
pub use setting::{ApiSetting, CATEGORY_HTTP};
pub use variable::{Variable, VariableCategory};
