//! Application use cases (business logic orchestration).

mod import_api;
mod send_request;

pub use import_api::*;
pub use send_request::*;
