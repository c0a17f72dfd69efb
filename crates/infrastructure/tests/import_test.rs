//! Import into the local store, end to end.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;

use courier_application::ports::{EntityRepository, KeyValueStore};
use courier_domain::{ApiFolder, ApiSetting, Entity, Environment, ListScope};
use courier_infrastructure::{
    ApiImporter, ImportError, LOCAL_LIST_KEY, MemoryKeyValueStore, local_repositories,
};

const POSTMAN: &str = r#"{
  "info": {"name": "Demo"},
  "item": [
    {"name": "Auth", "item": [
      {"name": "Login", "request": {"method": "POST", "url": {"raw": "{{host}}/login"},
        "body": {"mode": "raw", "raw": "{\"user\":\"a\"}"}}}
    ]},
    {"name": "Health", "request": {"method": "GET", "url": {"raw": "{{host}}/health?verbose=1"}}}
  ],
  "variable": [{"key": "host", "value": "https://api.example.com"}, {"key": "", "value": ""}]
}"#;

const INSOMNIA: &str = r#"{
  "resources": [
    {"_id": "req_a", "_type": "request", "parentId": "fld_a", "name": "List",
     "method": "GET", "url": "https://x.com/items", "body": {}, "headers": [], "parameters": []},
    {"_id": "fld_a", "_type": "request_group", "parentId": "wrk_1", "name": "Items"}
  ]
}"#;

fn setup() -> (Arc<dyn KeyValueStore>, ApiImporter) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
    let importer = ApiImporter::new(&local_repositories(&store));
    (store, importer)
}

async fn stored<E: Entity>(store: &Arc<dyn KeyValueStore>) -> Vec<E> {
    store
        .get(E::KIND.store_name(), LOCAL_LIST_KEY)
        .await
        .unwrap()
        .map(|v| serde_json::from_value(v).unwrap())
        .unwrap_or_default()
}

#[tokio::test]
async fn postman_import_persists_tree_and_environments() {
    let (store, importer) = setup();

    let output = importer.import("postMan", "c1", POSTMAN).await.unwrap();
    assert_eq!(output.folders, 1);
    assert_eq!(output.settings, 2);
    assert_eq!(output.environments, 1);

    let folders: Vec<ApiFolder> = stored(&store).await;
    let settings: Vec<ApiSetting> = stored(&store).await;
    let envs: Vec<Environment> = stored(&store).await;

    let login = settings.iter().find(|s| s.name == "Login").unwrap();
    let health = settings.iter().find(|s| s.name == "Health").unwrap();
    assert_eq!(folders[0].child_ids(), vec![login.id.as_str()]);
    assert_eq!(output.top_ids, vec![folders[0].id.clone(), health.id.clone()]);

    let req = health.request().unwrap();
    assert_eq!(req.uri, "{{host}}/health");
    assert_eq!(req.query[0].key, "verbose");

    assert_eq!(envs.len(), 1);
    assert_eq!(envs[0].name, "host");
    assert_eq!(envs[0].collection, "c1");
}

#[tokio::test]
async fn insomnia_import_links_children() {
    let (store, importer) = setup();

    let output = importer.import("insomnia", "c1", INSOMNIA).await.unwrap();
    let folders: Vec<ApiFolder> = stored(&store).await;
    let settings: Vec<ApiSetting> = stored(&store).await;

    assert_eq!(output.top_ids, vec![folders[0].id.clone()]);
    assert_eq!(folders[0].children, settings[0].id);
}

#[tokio::test]
async fn malformed_import_persists_nothing() {
    let (store, importer) = setup();

    let err = importer
        .import("insomnia", "c1", r#"{"resources": {}}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::InvalidFormat(_)));
    assert!(stored::<ApiFolder>(&store).await.is_empty());
    assert!(stored::<ApiSetting>(&store).await.is_empty());
}

#[tokio::test]
async fn unsupported_category() {
    let (_, importer) = setup();

    let err = importer.import("har", "c1", "{}").await.unwrap_err();
    assert_eq!(err.to_string(), "har is not supported");
}

#[tokio::test]
async fn reimporting_native_export_moves_collection() {
    let (store, importer) = setup();
    importer.import("postMan", "c1", POSTMAN).await.unwrap();

    let folders: Vec<ApiFolder> = stored(&store).await;
    let exported = serde_json::to_string(&folders).unwrap();

    let (other, importer) = setup();
    importer.import("file", "c2", &exported).await.unwrap();
    let copied: Vec<ApiFolder> = stored(&other).await;
    assert_eq!(copied.len(), 1);
    assert_eq!(copied[0].collection, "c2");
    assert_eq!(copied[0].children, folders[0].children);

    let scoped = local_repositories(&other)
        .folders
        .list(&ListScope::collection("c1"))
        .await
        .unwrap();
    assert!(scoped.is_empty());
}
