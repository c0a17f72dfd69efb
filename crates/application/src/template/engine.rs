//! Template function evaluation
//!
//! Applies each handler's function chain right to left, threading a value
//! through the steps, and splices the results back into the source text.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use sha2::{Digest, Sha256};

use courier_domain::response::classify;
use courier_domain::{ListScope, Variable, VariableCategory};

use super::function::TemplateFn;
use super::parser::{FnHandler, FnParam, parse_functions};
use crate::error::TemplateError;
use crate::ports::{BaseDir, Clock, EntityRepository, FilePicker, FileSystem};
use crate::response_cache::ResponseCache;

const PICKER_TITLE: &str = "Select file";

/// The value threaded through a function chain.
#[derive(Debug, Clone, PartialEq)]
enum FnValue {
    Text(String),
    List(Vec<String>),
    Bytes(Vec<u8>),
    Json(Value),
    Empty,
}

impl From<&FnParam> for FnValue {
    fn from(param: &FnParam) -> Self {
        match param {
            FnParam::Single(s) => Self::Text(s.clone()),
            FnParam::List(items) => Self::List(items.clone()),
        }
    }
}

impl FnValue {
    fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(","),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Json(Value::String(s)) => s.clone(),
            Self::Json(value) => value.to_string(),
            Self::Empty => String::new(),
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            other => other.to_text().into_bytes(),
        }
    }

    /// File functions take `path` or `[path, dir]`.
    fn file_params(&self) -> (String, BaseDir) {
        match self {
            Self::List(items) => {
                let path = items.first().cloned().unwrap_or_default();
                let dir = items
                    .get(1)
                    .filter(|d| !d.is_empty())
                    .map_or(BaseDir::Download, |d| BaseDir::from_name(d));
                (path, dir)
            }
            other => (other.to_text(), BaseDir::Download),
        }
    }
}

/// Walks a dotted path such as `data.items[0].name` or `data.items.0.name`.
fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let keys = path
        .split('.')
        .flat_map(|segment| segment.split(['[', ']']))
        .filter(|key| !key.is_empty());

    let mut current = root;
    for key in keys {
        current = match current {
            Value::Object(map) => map.get(key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Evaluates template functions.
#[derive(Clone)]
pub struct TemplateEngine {
    fs: Arc<dyn FileSystem>,
    picker: Arc<dyn FilePicker>,
    cache: ResponseCache,
    variables: Arc<dyn EntityRepository<Variable>>,
    clock: Arc<dyn Clock>,
}

impl TemplateEngine {
    /// Creates an engine over its collaborators.
    #[must_use]
    pub fn new(
        fs: Arc<dyn FileSystem>,
        picker: Arc<dyn FilePicker>,
        cache: ResponseCache,
        variables: Arc<dyn EntityRepository<Variable>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fs,
            picker,
            cache,
            variables,
            clock,
        }
    }

    /// Replaces every `{{...}}` handler in `input` with its result.
    ///
    /// Text without handlers is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a handler.
    pub async fn resolve(&self, collection: &str, input: &str) -> Result<String, TemplateError> {
        let handlers = parse_functions(collection, input);
        if handlers.is_empty() {
            return Ok(input.to_string());
        }

        let mut output = String::with_capacity(input.len());
        let mut last = 0;
        for handler in &handlers {
            output.push_str(&input[last..handler.span.start]);
            output.push_str(&self.apply(handler).await?);
            last = handler.span.end;
        }
        output.push_str(&input[last..]);
        Ok(output)
    }

    /// Evaluates one handler.
    ///
    /// # Errors
    ///
    /// Returns an error if a function in the chain fails.
    pub async fn apply(&self, handler: &FnHandler) -> Result<String, TemplateError> {
        let mut value = FnValue::from(&handler.param);
        for name in handler.fn_list.iter().rev() {
            value = self.step(TemplateFn::from(name.as_str()), value, &handler.collection).await?;
        }
        Ok(value.to_text())
    }

    async fn step(
        &self,
        func: TemplateFn,
        value: FnValue,
        collection: &str,
    ) -> Result<FnValue, TemplateError> {
        let next = match func {
            TemplateFn::ReadTextFile => {
                let (path, dir) = value.file_params();
                FnValue::Text(self.fs.read_text(&path, dir).await?)
            }
            TemplateFn::ReadFile => {
                let (path, dir) = value.file_params();
                FnValue::Bytes(self.fs.read_binary(&path, dir).await?)
            }
            TemplateFn::Base64 => FnValue::Text(STANDARD.encode(value.into_bytes())),
            TemplateFn::OpenFile => match self.picker.pick_file(PICKER_TITLE).await {
                Some(path) => FnValue::Text(path),
                None => value,
            },
            TemplateFn::Timestamp => FnValue::Text(self.clock.unix_seconds().to_string()),
            TemplateFn::Md5 => FnValue::Text(format!("{:x}", md5::compute(value.to_text()))),
            TemplateFn::Sha256 => {
                FnValue::Text(hex::encode(Sha256::digest(value.to_text().as_bytes())))
            }
            TemplateFn::Get => self.get_from_response(value).await?,
            TemplateFn::Value => self.custom_value(value, collection).await?,
            TemplateFn::Unknown(name) => {
                tracing::debug!(function = %name, "unknown template function");
                value
            }
        };
        Ok(next)
    }

    async fn get_from_response(&self, value: FnValue) -> Result<FnValue, TemplateError> {
        let text = value.to_text();
        let parts: Vec<&str> = text.split(',').collect();
        let [id, path] = parts.as_slice() else {
            return Err(TemplateError::InvalidGetParams);
        };

        let Some(resp) = self.cache.latest(id.trim()).await? else {
            return Ok(value);
        };
        let body = classify(&resp)?;
        Ok(body
            .json
            .as_ref()
            .and_then(|json| lookup(json, path.trim()))
            .map_or(FnValue::Empty, |found| FnValue::Json(found.clone())))
    }

    async fn custom_value(&self, value: FnValue, collection: &str) -> Result<FnValue, TemplateError> {
        let name = value.to_text();
        let scope =
            ListScope::collection(collection).with_category(VariableCategory::Customize.as_str());
        let found = self
            .variables
            .list(&scope)
            .await?
            .into_iter()
            .find(|v| v.enabled.is_enabled() && v.name == name);
        Ok(found.map_or(value, |v| FnValue::Text(v.value)))
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine").finish_non_exhaustive()
    }
}
