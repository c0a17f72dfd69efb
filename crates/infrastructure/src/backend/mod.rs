//! Native backend access
//!
//! The native backend exposes one named command per operation. Commands are
//! posted as JSON to `{endpoint}/{command}`.

mod commands;
mod http_backend;

pub use commands::{CMD_DELETE_API_FOLDER, CommandSet, list_args};
pub use http_backend::{DEFAULT_TIMEOUT, HttpCommandBackend};
