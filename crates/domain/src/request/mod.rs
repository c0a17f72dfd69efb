//! HTTP Request domain types

mod kv;
mod method;
mod spec;

pub use kv::KvParam;
pub use method::HttpMethod;
pub use spec::{CONTENT_TYPE_JSON, HttpRequest};
