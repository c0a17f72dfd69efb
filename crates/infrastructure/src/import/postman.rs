//! Postman collection converter.

use serde::Deserialize;
use serde_json::Value;

use courier_domain::{ApiFolder, ApiSetting, Environment, ImportData, KvParam};

use super::ImportError;
use super::query::RequestParts;

#[derive(Debug, Deserialize)]
struct PostmanItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    item: Vec<PostmanItem>,
    #[serde(default)]
    request: Option<PostmanRequest>,
}

#[derive(Debug, Deserialize)]
struct PostmanRequest {
    #[serde(default)]
    method: String,
    #[serde(default)]
    url: Option<PostmanUrl>,
    #[serde(default)]
    query: Vec<PostmanParam>,
    #[serde(default)]
    header: Vec<PostmanParam>,
    #[serde(default)]
    body: Option<PostmanBody>,
}

/// A URL is either a plain string or an object carrying `raw`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PostmanUrl {
    Text(String),
    Structured {
        #[serde(default)]
        raw: Option<String>,
    },
}

impl PostmanUrl {
    fn raw(self) -> String {
        match self {
            Self::Text(raw) | Self::Structured { raw: Some(raw) } => raw,
            Self::Structured { raw: None } => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostmanParam {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    disabled: bool,
}

impl PostmanParam {
    fn into_param(self) -> KvParam {
        let key = self.key.unwrap_or_default();
        let value = self.value.unwrap_or_default();
        if self.disabled {
            KvParam::disabled(key, value)
        } else {
            KvParam::new(key, value)
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostmanBody {
    #[serde(default)]
    raw: Option<String>,
}

/// Converts a Postman collection export.
///
/// Items carrying a `request` become settings, every other item becomes a
/// folder whose children are its converted sub-items. Collection variables
/// become environments.
pub fn convert(root: &Value, collection: &str) -> Result<ImportData, ImportError> {
    let Some(items) = root.get("item").filter(|v| v.is_array()) else {
        return Err(ImportError::InvalidFormat(
            "postman collection has no item list".to_string(),
        ));
    };
    let items: Vec<PostmanItem> = serde_json::from_value(items.clone())
        .map_err(|e| ImportError::InvalidFormat(e.to_string()))?;

    let mut data = ImportData::default();
    let mut roots = Vec::new();
    convert_items(items, collection, &mut data, &mut roots)?;
    data.environments = variables(root, collection);
    Ok(data)
}

fn convert_items(
    items: Vec<PostmanItem>,
    collection: &str,
    data: &mut ImportData,
    parent_children: &mut Vec<String>,
) -> Result<(), ImportError> {
    for item in items {
        if let Some(request) = item.request {
            let req = request_parts(request).into_request();
            let setting = ApiSetting::http(collection, item.name, &req)?;
            parent_children.push(setting.id.clone());
            data.settings.push(setting);
            continue;
        }

        let mut folder = ApiFolder::new(collection, item.name);
        parent_children.push(folder.id.clone());
        let mut children = Vec::new();
        // Register the folder before its descendants.
        let slot = data.folders.len();
        data.folders.push(folder.clone());
        convert_items(item.item, collection, data, &mut children)?;
        folder.set_children(&children);
        data.folders[slot] = folder;
    }
    Ok(())
}

fn request_parts(request: PostmanRequest) -> RequestParts {
    RequestParts {
        method: request.method,
        uri: request.url.map(PostmanUrl::raw).unwrap_or_default(),
        body: request.body.and_then(|b| b.raw).unwrap_or_default(),
        query: request.query.into_iter().map(PostmanParam::into_param).collect(),
        headers: request.header.into_iter().map(PostmanParam::into_param).collect(),
    }
}

fn variables(root: &Value, collection: &str) -> Vec<Environment> {
    let Some(Value::Array(vars)) = root.get("variable") else {
        return Vec::new();
    };
    vars.iter()
        .map(|var| {
            let name = var.get("key").map(text).unwrap_or_default();
            let value = var.get("value").map(text).unwrap_or_default();
            Environment::new(name, value).in_collection(collection)
        })
        .collect()
}

/// Strings as-is, null as empty, other values as their JSON text.
pub(super) fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use courier_domain::{HttpMethod, HttpRequest};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_nested_items() {
        let root = json!({
            "item": [
                {
                    "name": "Users",
                    "item": [
                        {"name": "List", "request": {"method": "GET", "url": {"raw": "/users?page=1"}}},
                        {"name": "Admin", "item": [
                            {"name": "Ban", "request": {"method": "POST", "url": "/ban", "body": {"mode": "raw", "raw": "{\"id\":1}"}}}
                        ]}
                    ]
                },
                {"name": "Ping", "request": {"method": "GET", "url": {"raw": "/ping"}}}
            ]
        });

        let data = convert(&root, "c1").unwrap();
        assert_eq!(data.folders.len(), 2);
        assert_eq!(data.settings.len(), 3);

        let users = &data.folders[0];
        let admin = &data.folders[1];
        assert_eq!(users.name, "Users");
        assert_eq!(users.child_ids(), vec![data.settings[0].id.as_str(), admin.id.as_str()]);
        assert_eq!(admin.child_ids(), vec![data.settings[1].id.as_str()]);
        assert_eq!(data.top_level_ids(), vec![users.id.clone(), data.settings[2].id.clone()]);

        let list: HttpRequest = data.settings[0].request().unwrap();
        assert_eq!(list.uri, "/users");
        assert_eq!(list.query, vec![KvParam::new("page", "1")]);

        let ban = data.settings[1].request().unwrap();
        assert_eq!(ban.method, HttpMethod::Post);
        assert_eq!(ban.content_type, "application/json");
        assert!(data.settings.iter().all(|s| s.collection == "c1" && s.is_http()));
    }

    #[test]
    fn test_request_query_and_headers() {
        let root = json!({"item": [{
            "name": "q",
            "request": {
                "method": "GET",
                "url": {"raw": "/s?b=2"},
                "query": [{"key": "a", "value": "1"}],
                "header": [{"key": "X-On", "value": "1"}, {"key": "X-Off", "value": "0", "disabled": true}]
            }
        }]});

        let req = convert(&root, "c1").unwrap().settings[0].request().unwrap();
        assert_eq!(req.query, vec![KvParam::new("a", "1"), KvParam::new("b", "2")]);
        assert_eq!(
            req.headers,
            vec![KvParam::new("X-On", "1"), KvParam::disabled("X-Off", "0")]
        );
    }

    #[test]
    fn test_variables_become_environments() {
        let root = json!({
            "item": [],
            "variable": [{"key": "host", "value": "api.x.com"}, {"key": "port", "value": 8080}]
        });

        let envs = convert(&root, "c1").unwrap().environments;
        assert_eq!(envs.len(), 2);
        assert_eq!((envs[0].name.as_str(), envs[0].value.as_str()), ("host", "api.x.com"));
        assert_eq!(envs[1].value, "8080");
        assert_eq!(envs[1].collection, "c1");
    }

    #[test]
    fn test_missing_item_list() {
        for root in [json!({}), json!({"item": {}})] {
            let err = convert(&root, "c1").unwrap_err();
            assert!(matches!(err, ImportError::InvalidFormat(_)));
        }
    }
}
