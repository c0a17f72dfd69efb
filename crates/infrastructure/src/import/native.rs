//! Converter for entities exported by this application.

use chrono::Utc;
use serde_json::{Map, Value};

use courier_domain::{ApiFolder, ApiSetting, CATEGORY_HTTP, ImportData, generate_id};

use super::ImportError;

/// Converts one exported entity or an array of them.
///
/// Every entry is moved into `collection`. Entries of category `http` are
/// settings, all others folders. Missing ids and timestamps are filled in.
pub fn convert(root: Value, collection: &str) -> Result<ImportData, ImportError> {
    let entries = match root {
        Value::Array(entries) => entries,
        other => vec![other],
    };

    let mut data = ImportData::default();
    for entry in entries {
        let Value::Object(mut record) = entry else {
            return Err(ImportError::InvalidFormat(
                "exported entity must be an object".to_string(),
            ));
        };
        complete(&mut record, collection);

        let is_setting = record.get("category").and_then(Value::as_str) == Some(CATEGORY_HTTP);
        let record = Value::Object(record);
        if is_setting {
            data.settings.push(decode::<ApiSetting>(record)?);
        } else {
            data.folders.push(decode::<ApiFolder>(record)?);
        }
    }
    Ok(data)
}

fn complete(record: &mut Map<String, Value>, collection: &str) {
    record.insert("collection".to_string(), Value::String(collection.to_string()));
    let has_id = record
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        record.insert("id".to_string(), Value::String(generate_id()));
    }
    let now = Value::String(Utc::now().to_rfc3339());
    for key in ["createdAt", "updatedAt"] {
        record.entry(key).or_insert_with(|| now.clone());
    }
}

fn decode<T: serde::de::DeserializeOwned>(record: Value) -> Result<T, ImportError> {
    serde_json::from_value(record).map_err(|e| ImportError::InvalidFormat(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_array_is_split_by_category() {
        let root = json!([
            {"id": "s1", "category": "http", "name": "req", "collection": "old",
             "setting": "", "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"},
            {"id": "f1", "name": "folder", "children": "s1", "collection": "old"}
        ]);

        let data = convert(root, "c2").unwrap();
        assert_eq!(data.settings.len(), 1);
        assert_eq!(data.settings[0].collection, "c2");
        assert_eq!(data.folders[0].id, "f1");
        assert_eq!(data.folders[0].collection, "c2");
        assert_eq!(data.top_level_ids(), vec!["f1".to_string()]);
    }

    #[test]
    fn test_single_object_gets_an_id() {
        let data = convert(json!({"name": "loose"}), "c1").unwrap();
        assert_eq!(data.folders.len(), 1);
        assert!(!data.folders[0].id.is_empty());
    }

    #[test]
    fn test_non_object_entry() {
        let err = convert(json!([1]), "c1").unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(_)));
    }
}
