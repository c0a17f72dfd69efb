//! Entity persistence
//!
//! Two repository families back the entity stores: [`CommandRepository`]
//! routes every operation to a native backend command, [`LocalRepository`]
//! keeps each entity kind as one list in a key-value namespace. A process
//! picks one family at startup.

mod command_repository;
mod key_value;
mod local_repository;

use std::sync::Arc;

use tokio::sync::Mutex;

use courier_application::Repositories;
use courier_application::ports::{Backend, KeyValueStore};
use courier_domain::{ApiCollection, ApiFolder, ApiSetting, Cookie, Environment, Variable};

pub use command_repository::CommandRepository;
pub use key_value::{FileKeyValueStore, MemoryKeyValueStore};
pub use local_repository::{LOCAL_LIST_KEY, LocalRepository};

/// Builds repositories routed to native backend commands.
#[must_use]
pub fn native_repositories(backend: &Arc<dyn Backend>) -> Repositories {
    Repositories {
        collections: Arc::new(CommandRepository::<ApiCollection>::new(Arc::clone(backend))),
        folders: Arc::new(CommandRepository::<ApiFolder>::new(Arc::clone(backend))),
        settings: Arc::new(CommandRepository::<ApiSetting>::new(Arc::clone(backend))),
        environments: Arc::new(CommandRepository::<Environment>::new(Arc::clone(backend))),
        variables: Arc::new(CommandRepository::<Variable>::new(Arc::clone(backend))),
        cookies: Arc::new(CommandRepository::<Cookie>::new(Arc::clone(backend))),
    }
}

/// Builds repositories over the local key-value fallback. All of them share
/// one write lock.
#[must_use]
pub fn local_repositories(store: &Arc<dyn KeyValueStore>) -> Repositories {
    let write = Arc::new(Mutex::new(()));
    Repositories {
        collections: Arc::new(LocalRepository::<ApiCollection>::with_lock(
            Arc::clone(store),
            Arc::clone(&write),
        )),
        folders: Arc::new(LocalRepository::<ApiFolder>::with_lock(
            Arc::clone(store),
            Arc::clone(&write),
        )),
        settings: Arc::new(LocalRepository::<ApiSetting>::with_lock(
            Arc::clone(store),
            Arc::clone(&write),
        )),
        environments: Arc::new(LocalRepository::<Environment>::with_lock(
            Arc::clone(store),
            Arc::clone(&write),
        )),
        variables: Arc::new(LocalRepository::<Variable>::with_lock(
            Arc::clone(store),
            Arc::clone(&write),
        )),
        cookies: Arc::new(LocalRepository::<Cookie>::with_lock(Arc::clone(store), write)),
    }
}
