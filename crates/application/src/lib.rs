//! Courier Application - Use cases and ports
//!
//! This crate holds the client logic that sits between the domain model and
//! the outside world: the template function interpreter, the response
//! cache, the entity stores and the use cases that tie them together.
//! External systems are reached through the traits in [`ports`].

pub mod edit_guard;
pub mod error;
pub mod ports;
pub mod response_cache;
pub mod stores;
pub mod template;
pub mod use_cases;

#[cfg(test)]
mod testing;

pub use edit_guard::{DEBOUNCE_DELAY, Debouncer, EditGuard, EditTicket};
pub use error::{
    ApplicationError, ApplicationResult, StoreError, StoreResult, TemplateError,
};
pub use response_cache::{CachedResponse, ResponseCache};
pub use stores::{Repositories, Stores};
pub use template::TemplateEngine;
