//! Courier Domain - Core business types
//!
//! This crate defines the data model of the Courier API client: persisted
//! entities, the request shape stored inside settings, response records and
//! the rules used to display them. All types here are pure Rust with no I/O
//! dependencies.

pub mod cookie;
pub mod error;
pub mod id;
pub mod import;
pub mod persistence;
pub mod request;
pub mod response;

pub use cookie::Cookie;
pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use import::{ImportCategory, ImportData};
pub use persistence::{
    ApiCollection, ApiFolder, ApiSetting, CATEGORY_HTTP, Entity, EntityKind, Environment,
    ListScope, Status, Variable, VariableCategory,
};
pub use request::{CONTENT_TYPE_JSON, HttpMethod, HttpRequest, KvParam};
pub use response::{
    BodyCategory, HttpResponse, HttpStats, ResponseBodyResult, StatusCode, StatusSeverity,
};
