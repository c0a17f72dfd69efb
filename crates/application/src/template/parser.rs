//! Function parser for `{{fn(...)}}` syntax
//!
//! Extracts function handlers with their chain, seed parameter and position.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::unwrap_used)]
static HANDLER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{([\s\S]+?)\}\}").unwrap());

/// Seed parameter of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FnParam {
    /// A single value.
    Single(String),
    /// Several comma-separated values.
    List(Vec<String>),
}

impl FnParam {
    /// Returns the parameter as text, joining list items with commas.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::List(items) => items.join(","),
        }
    }
}

/// One parsed `{{...}}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnHandler {
    /// Collection whose variables the `value` function reads.
    pub collection: String,
    /// The matched text including braces.
    pub text: String,
    /// Byte range of the match in the source string.
    pub span: Range<usize>,
    /// Function names, outermost first.
    pub fn_list: Vec<String>,
    /// Seed parameter.
    pub param: FnParam,
}

/// Splits a parameter list on commas and strips whitespace and quotes.
///
/// Each piece is trimmed, then leading and trailing `'` characters are
/// removed, then `"` characters. One piece yields [`FnParam::Single`].
///
/// # Examples
///
/// ```
/// use courier_application::template::parser::{trim_param, FnParam};
///
/// assert_eq!(trim_param("'x'"), FnParam::Single("x".to_string()));
/// assert_eq!(
///     trim_param("'a', \"b\" , c"),
///     FnParam::List(vec!["a".into(), "b".into(), "c".into()])
/// );
/// ```
#[must_use]
pub fn trim_param(param: &str) -> FnParam {
    let mut items: Vec<String> = param
        .split(',')
        .map(|item| item.trim().trim_matches('\'').trim_matches('"').to_string())
        .collect();
    if items.len() < 2 {
        FnParam::Single(items.pop().unwrap_or_default())
    } else {
        FnParam::List(items)
    }
}

/// Locates the innermost parenthesized group: the first `)` and the last
/// `(` before it. Returns the chain text around it and the group content.
fn split_call(content: &str) -> Option<(String, &str)> {
    let close = content.find(')')?;
    let open = content[..close].rfind('(')?;
    let param = &content[open + 1..close];
    let chain: String = content[..open]
        .chars()
        .chain(content[close + 1..].chars())
        .filter(|c| *c != ')')
        .map(|c| if c == '(' { '.' } else { c })
        .collect();
    Some((chain, param))
}

/// Parses every function handler in `input`.
///
/// Parsing stops at the first `{{...}}` without a parenthesized group;
/// handlers found before it are returned.
#[must_use]
pub fn parse_functions(collection: &str, input: &str) -> Vec<FnHandler> {
    let mut handlers = Vec::new();
    for caps in HANDLER_RE.captures_iter(input) {
        let (Some(whole), Some(content)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let Some((chain, param)) = split_call(content.as_str()) else {
            break;
        };
        let fn_list = chain
            .split('.')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        handlers.push(FnHandler {
            collection: collection.to_string(),
            text: whole.as_str().to_string(),
            span: whole.range(),
            fn_list,
            param: trim_param(param),
        });
    }
    handlers
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(s: &str) -> FnParam {
        FnParam::Single(s.to_string())
    }

    #[test]
    fn test_trim_param() {
        assert_eq!(
            trim_param("'a', \"b\" , c"),
            FnParam::List(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(trim_param("'x'"), single("x"));
        assert_eq!(trim_param(""), single(""));
        assert_eq!(trim_param("  spaced  "), single("spaced"));
    }

    #[test]
    fn test_single_function() {
        let handlers = parse_functions("c1", "token: {{ts()}}");
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].fn_list, vec!["ts"]);
        assert_eq!(handlers[0].text, "{{ts()}}");
        assert_eq!(handlers[0].span, 7..15);
        assert_eq!(handlers[0].collection, "c1");
    }

    #[test]
    fn test_dotted_chain() {
        let handlers = parse_functions("", "{{b64.rf('a.png', desktop)}}");
        assert_eq!(handlers[0].fn_list, vec!["b64", "rf"]);
        assert_eq!(
            handlers[0].param,
            FnParam::List(vec!["a.png".to_string(), "desktop".to_string()])
        );
    }

    #[test]
    fn test_nested_call_chain() {
        let handlers = parse_functions("", "{{get(rf(x))}}");
        assert_eq!(handlers[0].fn_list, vec!["get", "rf"]);
        assert_eq!(handlers[0].param, single("x"));
    }

    #[test]
    fn test_multiple_handlers() {
        let handlers = parse_functions("", "a={{md5(x)}}&b={{sha256(y)}}");
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[1].fn_list, vec!["sha256"]);
        assert_eq!(handlers[1].param, single("y"));
    }

    #[test]
    fn test_missing_group_stops_parsing() {
        let handlers = parse_functions("", "{{md5(x)}} {{broken}} {{ts()}}");
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].fn_list, vec!["md5"]);
    }

    #[test]
    fn test_no_templates() {
        assert!(parse_functions("", "plain {text}").is_empty());
    }

    #[test]
    fn test_param_to_text() {
        let param = FnParam::List(vec!["id".to_string(), "data.name".to_string()]);
        assert_eq!(param.to_text(), "id,data.name");
    }
}
