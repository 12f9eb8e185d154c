//! PMStore Service - HTTP microservice for PM2.5 measurement records.
//!
//! A REST API exposing CRUD operations and PM2.5 statistics over a single
//! in-memory table loaded from a CSV dataset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PMSTORE_DATA_FILE` | CSV dataset loaded at startup | None (empty table) |
//! | `PMSTORE_PORT` | HTTP server port | 5000 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /getallrecords` - All records
//! - `GET /getrecord/{id}` - One record
//! - `POST /addrecord` - Insert a record
//! - `PUT /updaterecord/{id}` - Update a record
//! - `DELETE /deleterecord/{id}` - Delete a record
//! - `GET /records/filter?lat=X&long=Y` - Exact-match filter
//! - `GET /records/stats` - PM2.5 statistics
//! - `GET /records/geojson` - Records as GeoJSON
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use pmstore::{RecordStore, RecordStoreBuilder};
use pmstore_service::{router, ApiDoc, AppState};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pmstore_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port: u16 = std::env::var("PMSTORE_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);

    // The library reads PMSTORE_DATA_FILE; a missing variable means an empty
    // table, a broken file is fatal
    let store = match RecordStoreBuilder::from_env() {
        Ok(builder) => builder.build()?,
        Err(_) => {
            tracing::warn!("PMSTORE_DATA_FILE not set, starting with an empty table");
            RecordStore::new()
        }
    };

    tracing::info!(
        data_file = ?store.data_file(),
        records = store.len(),
        columns = store.schema().columns().len(),
        port = port,
        "Starting PMStore service"
    );

    let state = Arc::new(AppState { store });

    // Build router
    let app = router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
