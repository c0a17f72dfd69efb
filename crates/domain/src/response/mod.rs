//! Response types and display helpers.

mod body;
mod spec;
mod status;

pub use body::{BodyCategory, ResponseBodyResult, classify, decode_body, estimate_size};
pub use spec::{HeaderMap, HttpResponse, HttpStats};
pub use status::{StatusCode, StatusSeverity};
