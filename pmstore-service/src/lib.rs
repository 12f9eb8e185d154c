//! PMStore Service Library
//!
//! HTTP handlers, router and OpenAPI description for the PM2.5 record
//! service. This library is used by both the pmstore-service binary and
//! integration tests.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use pmstore::RecordStore;
use utoipa::OpenApi;

/// Application state shared across handlers.
pub struct AppState {
    /// The record table.
    pub store: RecordStore,
}

/// OpenAPI documentation for the PMStore service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PMStore Service",
        version = "0.1.0",
        description = "REST API for CRUD and statistics over PM2.5 measurement records.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::get_all_records,
        handlers::get_record,
        handlers::add_record,
        handlers::update_record,
        handlers::delete_record,
        handlers::filter_records,
        handlers::get_stats,
        handlers::get_geojson,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::FilterQuery,
            handlers::RecordBody,
            handlers::RecordListResponse,
            handlers::RecordResponse,
            handlers::RecordMessageResponse,
            handlers::InsertedId,
            handlers::InsertResponse,
            handlers::StatsResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "records", description = "Record CRUD, filtering and statistics"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the API router over `state`.
///
/// Middleware (tracing, CORS) and the Swagger UI are added by the binary.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/getallrecords", get(handlers::get_all_records))
        .route("/getrecord/:id", get(handlers::get_record))
        .route("/addrecord", post(handlers::add_record))
        .route("/updaterecord/:id", put(handlers::update_record))
        .route("/deleterecord/:id", delete(handlers::delete_record))
        .route("/records/filter", get(handlers::filter_records))
        .route("/records/stats", get(handlers::get_stats))
        .route("/records/geojson", get(handlers::get_geojson))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use error::ApiError;
pub use handlers::{
    ErrorResponse, FilterQuery, HealthResponse, InsertResponse, RecordListResponse,
    RecordMessageResponse, RecordResponse, StatsResponse,
};
