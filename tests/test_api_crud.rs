//! End-to-end CRUD tests: spin up the real router on a local port and
//! drive it over HTTP.

use scopestore::domain::scope::catalog;
use scopestore::transport::http::{create_router, AppState};
use scopestore::{BlobStore, ScopeRegistry};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

async fn spawn_server(data_dir: &Path) -> anyhow::Result<String> {
    let store = BlobStore::open(data_dir)?;
    let registry = ScopeRegistry::open(store, catalog::default_scopes())?;
    let state = AppState {
        registry: Arc::new(RwLock::new(registry)),
    };

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn test_record_crud_roundtrip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base_url = spawn_server(dir.path()).await?;
    let client = reqwest::Client::new();

    // Create; the primary-key value becomes the key, not a stored field.
    let created = client
        .post(format!("{base_url}/api/v1/Sensors"))
        .json(&json!({
            "ID": 7,
            "Designation": "Sensor1",
            "SerialNumber": 12345678,
            "Manufacturer": "Manufacture1"
        }))
        .send()
        .await?;
    assert_eq!(created.status(), 204);

    let record = client
        .get(format!("{base_url}/api/v1/Sensors/7"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(
        record,
        json!({
            "Designation": "Sensor1",
            "SerialNumber": 12345678,
            "Manufacturer": "Manufacture1"
        })
    );

    // Partial update leaves the other fields untouched.
    let patched = client
        .patch(format!("{base_url}/api/v1/Sensors/7"))
        .json(&json!({ "Manufacturer": "Manufacture2" }))
        .send()
        .await?;
    assert_eq!(patched.status(), 204);

    let record = client
        .get(format!("{base_url}/api/v1/Sensors/7"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(record["Designation"], json!("Sensor1"));
    assert_eq!(record["Manufacturer"], json!("Manufacture2"));

    // Delete succeeds once, then the record is gone.
    let deleted = client
        .delete(format!("{base_url}/api/v1/Sensors/7"))
        .send()
        .await?;
    assert_eq!(deleted.status(), 204);

    let deleted_again = client
        .delete(format!("{base_url}/api/v1/Sensors/7"))
        .send()
        .await?;
    assert_eq!(deleted_again.status(), 404);

    let read_after_delete = client
        .get(format!("{base_url}/api/v1/Sensors/7"))
        .send()
        .await?;
    assert_eq!(read_after_delete.status(), 404);

    Ok(())
}

#[tokio::test]
async fn test_create_without_primary_key_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base_url = spawn_server(dir.path()).await?;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{base_url}/api/v1/Sensors"))
        .json(&json!({ "Designation": "Sensor1" }))
        .send()
        .await?;
    assert_eq!(created.status(), 422);

    let listing = client
        .get(format!("{base_url}/api/v1/Sensors"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(listing, json!({}));

    Ok(())
}

#[tokio::test]
async fn test_insertion_index_keys_and_pagination() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base_url = spawn_server(dir.path()).await?;
    let client = reqwest::Client::new();

    for value in 0..5 {
        let created = client
            .post(format!("{base_url}/api/v1/Measurements"))
            .json(&json!({ "SensorID": 1, "Value": value }))
            .send()
            .await?;
        assert_eq!(created.status(), 204);
    }

    let listing = client
        .get(format!("{base_url}/api/v1/Measurements"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let keys: Vec<_> = listing.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["0", "1", "2", "3", "4"]);

    // from=2&count=1 yields exactly the third inserted record.
    let page = client
        .get(format!("{base_url}/api/v1/Measurements?from=2&count=1"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(page, json!({ "2": { "SensorID": 1, "Value": 2 } }));

    Ok(())
}

#[tokio::test]
async fn test_scope_listing_and_structure() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base_url = spawn_server(dir.path()).await?;
    let client = reqwest::Client::new();

    let scopes = client
        .get(format!("{base_url}/api/v1/:scopes"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(
        scopes,
        json!(["Sensors", "Locations", "PhysicalQuantities", "Measurements"])
    );

    // Populate the scope; the structure must still not leak values.
    client
        .post(format!("{base_url}/api/v1/Sensors"))
        .json(&json!({ "ID": 1, "Designation": "Sensor1" }))
        .send()
        .await?;

    let structure = client
        .get(format!("{base_url}/api/v1/Sensors/:structure"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(structure["name"], json!("Sensors"));
    assert_eq!(structure["primary_key"], json!("ID"));
    assert_eq!(structure["columns"][0], json!("ID"));
    assert!(structure.get("values").is_none());

    Ok(())
}

#[tokio::test]
async fn test_column_read() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base_url = spawn_server(dir.path()).await?;
    let client = reqwest::Client::new();

    client
        .post(format!("{base_url}/api/v1/Locations"))
        .json(&json!({ "ID": 3, "Designation": "Crooked Forest", "Coordinates": [53.1969, 14.4930] }))
        .send()
        .await?;

    let coordinates = client
        .get(format!("{base_url}/api/v1/Locations/3/Coordinates"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(coordinates, json!([53.1969, 14.4930]));

    let missing_column = client
        .get(format!("{base_url}/api/v1/Locations/3/Altitude"))
        .send()
        .await?;
    assert_eq!(missing_column.status(), 404);

    let missing_record = client
        .get(format!("{base_url}/api/v1/Locations/99/Coordinates"))
        .send()
        .await?;
    assert_eq!(missing_record.status(), 404);

    Ok(())
}

#[tokio::test]
async fn test_create_from_query_string_and_escaped_keys() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base_url = spawn_server(dir.path()).await?;
    let client = reqwest::Client::new();

    // No body at all: the record comes from the query string.
    let created = client
        .post(format!("{base_url}/api/v1/PhysicalQuantities"))
        .query(&[
            ("Name", "Amount Of Substance"),
            ("Unit", "mole"),
            ("FormulaSymbol", "mol"),
        ])
        .send()
        .await?;
    assert_eq!(created.status(), 204);

    // Space-containing keys are addressed with `+` in the path.
    let record = client
        .get(format!("{base_url}/api/v1/PhysicalQuantities/Amount+Of+Substance"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(record["Unit"], json!("mole"));

    Ok(())
}

#[tokio::test]
async fn test_scope_segment_is_case_insensitive() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base_url = spawn_server(dir.path()).await?;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{base_url}/api/v1/sensors"))
        .json(&json!({ "ID": 1, "Designation": "Sensor1" }))
        .send()
        .await?;
    assert_eq!(created.status(), 204);

    let read = client
        .get(format!("{base_url}/api/v1/SENSORS/1"))
        .send()
        .await?;
    assert_eq!(read.status(), 200);

    Ok(())
}

#[tokio::test]
async fn test_unknown_scope_is_not_found() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base_url = spawn_server(dir.path()).await?;
    let client = reqwest::Client::new();

    let listing = client
        .get(format!("{base_url}/api/v1/Nonsense"))
        .send()
        .await?;
    assert_eq!(listing.status(), 404);

    let created = client
        .post(format!("{base_url}/api/v1/Nonsense"))
        .json(&json!({ "ID": 1 }))
        .send()
        .await?;
    assert_eq!(created.status(), 404);

    Ok(())
}
