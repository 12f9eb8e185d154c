//! HTTP request handlers for the record service.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use geojson::FeatureCollection;
use pmstore::{
    geojson::records_to_feature_collection, PmStats, Record, RecordFields, RecordFilter,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::AppState;

const SUCCESS: &str = "success";

/// Query parameters for filter endpoints.
///
/// A coordinate that is empty or not a number is treated as not supplied,
/// so it never narrows the result.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// Exact latitude to match.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lat: Option<f64>,
    /// Exact longitude to match.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub long: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCoordinate>::deserialize(deserializer).unwrap_or(None);
    Ok(match raw {
        Some(RawCoordinate::Number(n)) => Some(n),
        Some(RawCoordinate::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

impl From<FilterQuery> for RecordFilter {
    fn from(query: FilterQuery) -> Self {
        RecordFilter::new(query.lat, query.long)
    }
}

/// Body accepted by insert and update.
///
/// Only used for documentation; any other recognized dataset column may also
/// be supplied.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordBody {
    /// Longitude in decimal degrees (required on insert).
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    /// Latitude in decimal degrees (required on insert).
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    /// PM2.5 concentration (required on insert).
    #[serde(rename = "PM2.5_Level")]
    pub pm25_level: Option<f64>,
}

/// List of records.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordListResponse {
    /// Always `"success"`.
    pub status: String,
    /// Records in table order.
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Record>,
}

/// Single record.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordResponse {
    /// Always `"success"`.
    pub status: String,
    /// The record, including its `Id`.
    #[schema(value_type = Object)]
    pub data: Record,
}

/// Result of an update or delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordMessageResponse {
    /// Always `"success"`.
    pub status: String,
    /// Human-readable outcome.
    pub message: String,
    /// The updated record, or the record as it was before deletion.
    #[schema(value_type = Object)]
    pub data: Record,
}

/// Id assigned to an inserted record.
#[derive(Debug, Serialize, ToSchema)]
pub struct InsertedId {
    /// New record Id.
    #[serde(rename = "Id")]
    pub id: u64,
}

/// Result of an insert.
#[derive(Debug, Serialize, ToSchema)]
pub struct InsertResponse {
    /// Always `"success"`.
    pub status: String,
    /// Human-readable outcome.
    pub message: String,
    /// The new Id.
    pub data: InsertedId,
}

/// PM2.5 statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Always `"success"`.
    pub status: String,
    /// `count`, `average_PM2.5`, `max_PM2.5`, `min_PM2.5`. The three
    /// aggregates are null when there are no levels.
    #[schema(value_type = Object)]
    pub data: PmStats,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status: String,
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Number of records in the table.
    pub records: usize,
}

/// Retrieve all records.
#[utoipa::path(
    get,
    path = "/getallrecords",
    tag = "records",
    responses(
        (status = 200, description = "All records in table order", body = RecordListResponse)
    )
)]
pub async fn get_all_records(State(state): State<Arc<AppState>>) -> Json<RecordListResponse> {
    let records = state.store.list_all();
    tracing::debug!(count = records.len(), "Listing all records");

    Json(RecordListResponse {
        status: SUCCESS.to_string(),
        data: records,
    })
}

/// Fetch a record by Id.
///
/// # Returns
///
/// - `200 OK` with the record
/// - `400 Bad Request` if the Id is not a non-negative integer
/// - `404 Not Found` if no record has this Id
#[utoipa::path(
    get,
    path = "/getrecord/{id}",
    tag = "records",
    params(("id" = u64, Path, description = "Record Id")),
    responses(
        (status = 200, description = "Record found", body = RecordResponse),
        (status = 400, description = "Malformed Id", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse)
    )
)]
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<RecordResponse>, ApiError> {
    let Path(id) = id?;
    tracing::debug!(id = id, "Record query");

    let record = state.store.get(id)?;

    Ok(Json(RecordResponse {
        status: SUCCESS.to_string(),
        data: record,
    }))
}

/// Add a new record.
///
/// `Longitude`, `Latitude` and `PM2.5_Level` are required. The Id is
/// assigned by the server; a client-supplied `Id` is ignored.
///
/// # Returns
///
/// - `201 Created` with the new Id
/// - `400 Bad Request` if a required field is missing or the body is malformed
#[utoipa::path(
    post,
    path = "/addrecord",
    tag = "records",
    request_body = RecordBody,
    responses(
        (status = 201, description = "Record added", body = InsertResponse),
        (status = 400, description = "Missing field or malformed body", body = ErrorResponse)
    )
)]
pub async fn add_record(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordFields>, JsonRejection>,
) -> Result<(StatusCode, Json<InsertResponse>), ApiError> {
    let Json(fields) = payload?;

    let id = state.store.insert(fields)?;
    tracing::info!(id = id, "Record added");

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            status: SUCCESS.to_string(),
            message: "Record added successfully.".to_string(),
            data: InsertedId { id },
        }),
    ))
}

/// Update an existing record.
///
/// Only keys naming recognized columns are applied; other keys, including
/// `Id`, are ignored.
///
/// # Returns
///
/// - `200 OK` with the full updated record
/// - `400 Bad Request` if the Id or body is malformed
/// - `404 Not Found` if no record has this Id
#[utoipa::path(
    put,
    path = "/updaterecord/{id}",
    tag = "records",
    params(("id" = u64, Path, description = "Record Id")),
    request_body = RecordBody,
    responses(
        (status = 200, description = "Record updated", body = RecordMessageResponse),
        (status = 400, description = "Malformed Id or body", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse)
    )
)]
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<RecordFields>, JsonRejection>,
) -> Result<Json<RecordMessageResponse>, ApiError> {
    let Path(id) = id?;
    let Json(fields) = payload?;

    let record = state.store.update(id, fields)?;
    tracing::info!(id = id, "Record updated");

    Ok(Json(RecordMessageResponse {
        status: SUCCESS.to_string(),
        message: "Record updated successfully.".to_string(),
        data: record,
    }))
}

/// Delete a record.
///
/// # Returns
///
/// - `200 OK` with the record as it was before deletion
/// - `404 Not Found` if no record has this Id
#[utoipa::path(
    delete,
    path = "/deleterecord/{id}",
    tag = "records",
    params(("id" = u64, Path, description = "Record Id")),
    responses(
        (status = 200, description = "Record deleted", body = RecordMessageResponse),
        (status = 400, description = "Malformed Id", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse)
    )
)]
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<RecordMessageResponse>, ApiError> {
    let Path(id) = id?;

    let record = state.store.delete(id)?;
    tracing::info!(id = id, "Record deleted");

    Ok(Json(RecordMessageResponse {
        status: SUCCESS.to_string(),
        message: "Record deleted successfully.".to_string(),
        data: record,
    }))
}

/// Filter records by exact latitude and/or longitude.
///
/// # Query Parameters
///
/// - `lat`: Optional latitude to match exactly
/// - `long`: Optional longitude to match exactly
///
/// With neither parameter, every record is returned.
#[utoipa::path(
    get,
    path = "/records/filter",
    tag = "records",
    params(FilterQuery),
    responses(
        (status = 200, description = "Matching records in table order", body = RecordListResponse)
    )
)]
pub async fn filter_records(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Json<RecordListResponse> {
    let query = filter_query(query);
    tracing::debug!(lat = ?query.lat, long = ?query.long, "Filter query");

    let records = state.store.filter(&query.into());

    Json(RecordListResponse {
        status: SUCCESS.to_string(),
        data: records,
    })
}

/// PM2.5 statistics over all records.
#[utoipa::path(
    get,
    path = "/records/stats",
    tag = "records",
    responses(
        (status = 200, description = "PM2.5 statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let stats = state.store.stats();
    tracing::debug!(count = stats.count, "Stats query");

    Json(StatsResponse {
        status: SUCCESS.to_string(),
        data: stats,
    })
}

/// Records as a GeoJSON FeatureCollection of points.
///
/// Accepts the same `lat`/`long` parameters as `/records/filter`, with the
/// same handling of unusable values.
#[utoipa::path(
    get,
    path = "/records/geojson",
    tag = "records",
    params(FilterQuery),
    responses(
        (status = 200, description = "GeoJSON FeatureCollection of Point features")
    )
)]
pub async fn get_geojson(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Json<FeatureCollection> {
    let query = filter_query(query);
    let records = state.store.filter(&query.into());

    Json(records_to_feature_collection(&records))
}

/// Unusable query strings select every record instead of failing.
fn filter_query(query: Result<Query<FilterQuery>, QueryRejection>) -> FilterQuery {
    match query {
        Ok(Query(query)) => query,
        Err(e) => {
            tracing::debug!(error = %e.body_text(), "Ignoring unparseable filter query");
            FilterQuery::default()
        }
    }
}

/// Health check endpoint.
///
/// Returns service status, version and table size.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.store.len(),
    })
}
