//! Insomnia export converter.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use courier_domain::{ApiFolder, ApiSetting, Environment, ImportData, KvParam};

use super::ImportError;
use super::postman::text;
use super::query::RequestParts;

const TYPE_REQUEST: &str = "request";
const TYPE_GROUP: &str = "request_group";
const TYPE_ENVIRONMENT: &str = "environment";
const WORKSPACE_PREFIX: &str = "wrk_";

#[derive(Debug, Deserialize)]
struct Resource {
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(rename = "_type", default)]
    kind: String,
    #[serde(rename = "parentId", default)]
    parent_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    body: Option<ResourceBody>,
    #[serde(default)]
    headers: Vec<Pair>,
    #[serde(default)]
    parameters: Vec<Pair>,
}

impl Resource {
    fn parent(&self) -> &str {
        self.parent_id.as_deref().unwrap_or_default()
    }

    /// Groups directly under the workspace first, then other groups, then
    /// requests.
    fn rank(&self) -> u8 {
        match self.kind.as_str() {
            TYPE_GROUP if self.parent().starts_with(WORKSPACE_PREFIX) => 0,
            TYPE_GROUP => 1,
            _ => 2,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResourceBody {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Pair {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

fn params(pairs: Vec<Pair>) -> Vec<KvParam> {
    pairs
        .into_iter()
        .map(|p| (p.name.unwrap_or_default(), p.value.unwrap_or_default()))
        .filter(|(name, value)| !name.is_empty() || !value.is_empty())
        .map(|(name, value)| KvParam::new(name, value))
        .collect()
}

/// Converts an Insomnia export.
///
/// Request groups become folders and requests become settings, linked
/// through `parentId`. Items whose parent was not converted before them
/// land at the root. Environment resources contribute one environment
/// per data entry.
pub fn convert(root: &Value, collection: &str) -> Result<ImportData, ImportError> {
    let Some(Value::Array(raw)) = root.get("resources") else {
        return Err(ImportError::InvalidFormat(
            "insomnia export has no resources list".to_string(),
        ));
    };

    let mut data = ImportData::default();
    let mut resources = Vec::new();
    for value in raw {
        match value.get("_type").and_then(Value::as_str) {
            Some(TYPE_ENVIRONMENT) => {
                if let Some(Value::Object(entries)) = value.get("data") {
                    data.environments.extend(environments(entries, collection));
                }
            }
            Some(TYPE_REQUEST | TYPE_GROUP) => {
                let resource: Resource = serde_json::from_value(value.clone())
                    .map_err(|e| ImportError::InvalidFormat(e.to_string()))?;
                resources.push(resource);
            }
            _ => {}
        }
    }
    resources.sort_by_key(Resource::rank);

    // original `_id` -> new folder id, and children per new folder id
    let mut folder_ids: HashMap<String, String> = HashMap::new();
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    let mut attach = |id: &str, parent: &str, folder_ids: &HashMap<String, String>| {
        if let Some(folder) = folder_ids.get(parent) {
            children.entry(folder.clone()).or_default().push(id.to_string());
        }
    };

    for resource in resources {
        let name = resource.name.clone().unwrap_or_default();
        if resource.kind == TYPE_GROUP {
            let folder = ApiFolder::new(collection, name);
            folder_ids.insert(resource.id.clone(), folder.id.clone());
            attach(&folder.id, resource.parent(), &folder_ids);
            data.folders.push(folder);
            continue;
        }

        let parent = resource.parent().to_string();
        let req = RequestParts {
            method: resource.method.unwrap_or_default(),
            uri: resource.url.unwrap_or_default(),
            body: resource.body.and_then(|b| b.text).unwrap_or_default(),
            query: params(resource.parameters),
            headers: params(resource.headers),
        }
        .into_request();
        let setting = ApiSetting::http(collection, name, &req)?;
        attach(&setting.id, &parent, &folder_ids);
        data.settings.push(setting);
    }

    for folder in &mut data.folders {
        if let Some(ids) = children.get(&folder.id) {
            folder.set_children(ids);
        }
    }
    Ok(data)
}

fn environments(entries: &Map<String, Value>, collection: &str) -> Vec<Environment> {
    entries
        .iter()
        .map(|(name, value)| Environment::new(name.clone(), text(value)).in_collection(collection))
        .collect()
}
