//! Template function interpreter
//!
//! Request fields may embed `{{fn(...)}}` expressions. A chain of functions
//! (`{{b64.rf(file)}}` or `{{b64(rf(file))}}`) is applied right to left to
//! the seed parameter and the result replaces the expression.

mod engine;
mod function;
pub mod parser;

pub use engine::TemplateEngine;
pub use function::TemplateFn;
pub use parser::{FnHandler, FnParam, parse_functions, trim_param};
