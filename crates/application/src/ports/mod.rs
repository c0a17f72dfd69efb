//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod backend;
mod clock;
mod entity_repository;
mod file_system;
mod key_value_store;

pub use backend::{Backend, BackendError, CATEGORY_SEA_ORM, CMD_DO_HTTP_REQUEST};
pub use clock::Clock;
pub use entity_repository::{DeletedItems, EntityRepository, FolderRepository};
pub use file_system::{BaseDir, FilePicker, FileSystem, FileSystemError};
pub use key_value_store::KeyValueStore;
