//! Courier Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod backend;
pub mod import;
pub mod persistence;
pub mod serialization;

pub use adapters::{DirsFileSystem, PresetFilePicker, SystemClock};
pub use backend::{CommandSet, DEFAULT_TIMEOUT, HttpCommandBackend};
pub use import::{ApiImporter, ImportError, convert};
pub use persistence::{
    CommandRepository, FileKeyValueStore, LOCAL_LIST_KEY, LocalRepository, MemoryKeyValueStore,
    local_repositories, native_repositories,
};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
