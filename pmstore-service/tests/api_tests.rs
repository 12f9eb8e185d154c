//! Integration tests for the HTTP API.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use pmstore::{Record, RecordStore, RecordStoreBuilder, Schema};
use pmstore_service::{router, ApiDoc, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use utoipa::OpenApi;

/// Create a test server over the given store.
fn create_test_server(store: RecordStore) -> TestServer {
    let state = Arc::new(AppState { store });
    TestServer::new(router(state)).unwrap()
}

/// Create a test server over three sample records with levels 1, 2 and 3.
fn create_sample_server() -> TestServer {
    let records = vec![
        Record::new(0, -179.1, 68.0, 1.0),
        Record::new(1, -179.0, 68.0, 2.0),
        Record::new(2, -179.1, 67.5, 3.0),
    ];
    create_test_server(RecordStore::from_records(Schema::default(), records))
}

#[tokio::test]
async fn test_get_all_records() {
    let server = create_sample_server();

    let response = server.get("/getallrecords").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "success");
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["Id"], 0);
    assert_eq!(data[2]["Id"], 2);
    assert_eq!(data[1]["PM2.5_Level"], 2.0);
}

#[tokio::test]
async fn test_get_all_records_empty() {
    let server = create_test_server(RecordStore::new());

    let response = server.get("/getallrecords").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn test_get_record() {
    let server = create_sample_server();

    let response = server.get("/getrecord/1").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["Id"], 1);
    assert_eq!(json["data"]["Longitude"], -179.0);
    assert_eq!(json["data"]["Latitude"], 68.0);
}

#[tokio::test]
async fn test_get_record_not_found() {
    let server = create_sample_server();

    let response = server.get("/getrecord/99").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_get_record_malformed_id() {
    let server = create_sample_server();

    let response = server.get("/getrecord/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/getrecord/-1").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_record() {
    let server = create_sample_server();

    let response = server
        .post("/addrecord")
        .json(&json!({"Longitude": 10.0, "Latitude": 20.0, "PM2.5_Level": 30.0}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json: Value = response.json();
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "Record added successfully.");
    assert_eq!(json["data"]["Id"], 3);
}

#[tokio::test]
async fn test_add_record_missing_fields() {
    let server = create_sample_server();

    let response = server
        .post("/addrecord")
        .json(&json!({"Longitude": 10.0, "Latitude": 20.0}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("PM2.5_Level"));

    // Table unchanged
    let json: Value = server.get("/getallrecords").await.json();
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_add_record_malformed_body() {
    let server = create_sample_server();

    // Wrong type for a core column
    let response = server
        .post("/addrecord")
        .json(&json!({"Longitude": "east", "Latitude": 20.0, "PM2.5_Level": 30.0}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Not JSON at all
    let response = server.post("/addrecord").text("not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_record_ignores_client_id() {
    let server = create_sample_server();

    let response = server
        .post("/addrecord")
        .json(&json!({"Id": 50, "Longitude": 1.0, "Latitude": 2.0, "PM2.5_Level": 3.0}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json: Value = response.json();
    assert_eq!(json["data"]["Id"], 3);

    server
        .get("/getrecord/50")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_record() {
    let server = create_sample_server();

    let response = server
        .put("/updaterecord/0")
        .json(&json!({"PM2.5_Level": 3.1}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "Record updated successfully.");
    assert_eq!(json["data"]["PM2.5_Level"], 3.1);
    assert_eq!(json["data"]["Longitude"], -179.1);
    assert_eq!(json["data"]["Id"], 0);

    let json: Value = server.get("/getrecord/0").await.json();
    assert_eq!(json["data"]["PM2.5_Level"], 3.1);
}

#[tokio::test]
async fn test_update_record_ignores_unknown_columns_and_id() {
    let server = create_sample_server();
    let before: Value = server.get("/getrecord/1").await.json();

    let response = server
        .put("/updaterecord/1")
        .json(&json!({"Id": 7, "Humidity": 80}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["data"], before["data"]);

    server
        .get("/getrecord/7")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_record_not_found() {
    let server = create_sample_server();

    let response = server
        .put("/updaterecord/99")
        .json(&json!({"PM2.5_Level": 3.1}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_record() {
    let server = create_sample_server();

    let response = server.delete("/deleterecord/2").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["message"], "Record deleted successfully.");
    assert_eq!(json["data"]["Id"], 2);
    assert_eq!(json["data"]["PM2.5_Level"], 3.0);

    server
        .get("/getrecord/2")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete("/deleterecord/2")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filter_records() {
    let server = create_sample_server();

    // Latitude only
    let response = server.get("/records/filter?lat=68.0").await;
    response.assert_status_ok();
    let json: Value = response.json();
    let ids: Vec<u64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["Id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![0, 1]);

    // Both criteria
    let json: Value = server
        .get("/records/filter?lat=68.0&long=-179.1")
        .await
        .json();
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["Id"], 0);

    // No criteria
    let json: Value = server.get("/records/filter").await.json();
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    // No match is still success
    let response = server.get("/records/filter?lat=1.5").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn test_filter_records_ignores_unparseable_coordinate() {
    let server = create_sample_server();

    let ids = |json: &Value| -> Vec<u64> {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["Id"].as_u64().unwrap())
            .collect()
    };

    // A bad criterion selects nothing out, so every record comes back
    for path in ["/records/filter?lat=north", "/records/filter?lat="] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let json: Value = response.json();
        assert_eq!(json["status"], "success");
        assert_eq!(ids(&json), vec![0, 1, 2], "{path}");
    }

    // The usable criterion still applies
    let response = server.get("/records/filter?lat=68.0&long=x").await;
    response.assert_status_ok();
    assert_eq!(ids(&response.json()), vec![0, 1]);
}

#[tokio::test]
async fn test_geojson_ignores_unparseable_coordinate() {
    let server = create_sample_server();

    let response = server.get("/records/geojson?lat=north").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["features"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stats() {
    let server = create_sample_server();

    let response = server.get("/records/stats").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["count"], 3);
    assert_eq!(json["data"]["average_PM2.5"], 2.0);
    assert_eq!(json["data"]["max_PM2.5"], 3.0);
    assert_eq!(json["data"]["min_PM2.5"], 1.0);
}

#[tokio::test]
async fn test_stats_empty_table() {
    let server = create_test_server(RecordStore::new());

    let response = server.get("/records/stats").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["data"]["count"], 0);
    assert!(json["data"]["average_PM2.5"].is_null());
    assert!(json["data"]["max_PM2.5"].is_null());
    assert!(json["data"]["min_PM2.5"].is_null());
}

#[tokio::test]
async fn test_geojson() {
    let server = create_sample_server();

    let response = server.get("/records/geojson?lat=68.0").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["type"], "FeatureCollection");
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(features[0]["geometry"]["coordinates"], json!([-179.1, 68.0]));
    assert_eq!(features[0]["properties"]["PM2.5_Level"], 1.0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_sample_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].as_str().is_some());
    assert_eq!(json["records"], 3);
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let server = create_test_server(RecordStore::new());

    let response = server
        .post("/addrecord")
        .json(&json!({"Longitude": -179.1, "Latitude": 68.0, "PM2.5_Level": 2.8}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let json: Value = response.json();
    assert_eq!(json["data"]["Id"], 0);

    let json: Value = server.get("/getrecord/0").await.json();
    assert_eq!(json["data"]["Longitude"], -179.1);
    assert_eq!(json["data"]["Latitude"], 68.0);
    assert_eq!(json["data"]["PM2.5_Level"], 2.8);

    server.delete("/deleterecord/0").await.assert_status_ok();
    server
        .get("/getrecord/0")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dataset_with_extra_columns() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pm25.csv");
    std::fs::write(
        &path,
        "Longitude,Latitude,PM2.5_Level,Region\n-179.1,68.0,2.8,Arctic\n10.0,45.0,,Alps\n",
    )
    .unwrap();

    let store = RecordStoreBuilder::new(&path).build().unwrap();
    let server = create_test_server(store);

    let json: Value = server.get("/getrecord/1").await.json();
    assert_eq!(json["data"]["Region"], "Alps");
    assert!(json["data"]["PM2.5_Level"].is_null());

    // Extra columns can be updated but not created
    let json: Value = server
        .put("/updaterecord/1")
        .json(&json!({"Region": "Dolomites", "Country": "IT"}))
        .await
        .json();
    assert_eq!(json["data"]["Region"], "Dolomites");
    assert!(json["data"].get("Country").is_none());

    // Missing levels are not counted
    let json: Value = server.get("/records/stats").await.json();
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["average_PM2.5"], 2.8);

    // Inserted records get null for extra columns
    server
        .post("/addrecord")
        .json(&json!({"Longitude": 0.0, "Latitude": 0.0, "PM2.5_Level": 1.0}))
        .await
        .assert_status(StatusCode::CREATED);
    let json: Value = server.get("/getrecord/2").await.json();
    assert!(json["data"]["Region"].is_null());
}

#[tokio::test]
async fn test_record_keys_follow_dataset_header() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pm25.csv");
    std::fs::write(
        &path,
        "Zone,Longitude,Latitude,PM2.5_Level,Area\nB,-179.1,68.0,2.8,coast\n",
    )
    .unwrap();

    let server = create_test_server(RecordStoreBuilder::new(&path).build().unwrap());

    let body = server.get("/getrecord/0").await.text();
    let position = |key: &str| body.find(&format!("\"{key}\"")).unwrap();
    assert!(position("Id") < position("Longitude"));
    assert!(position("PM2.5_Level") < position("Zone"));
    assert!(position("Zone") < position("Area"), "{body}");
}

#[test]
fn test_openapi_lists_endpoints() {
    let doc = ApiDoc::openapi();
    let json = serde_json::to_value(&doc).unwrap();
    let paths = json["paths"].as_object().unwrap();

    for path in [
        "/getallrecords",
        "/getrecord/{id}",
        "/addrecord",
        "/updaterecord/{id}",
        "/deleterecord/{id}",
        "/records/filter",
        "/records/stats",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}
