//! # PMStore - PM2.5 Measurement Store
//!
//! In-memory table of air-quality measurements keyed by geographic
//! coordinates, with CRUD operations, exact-match filtering and aggregate
//! statistics.
//!
//! ## Features
//!
//! - **Synthetic keys**: every record gets an `Id` of `max + 1` on insert
//! - **Thread-safe**: one lock guards the whole table, so each operation is atomic
//! - **CSV datasets**: load the initial table from a CSV file with any extra columns
//! - **GeoJSON**: export records as point features (`geojson` feature)
//!
//! ## Quick Start
//!
//! ```ignore
//! use pmstore::{RecordFields, RecordFilter, RecordStoreBuilder};
//!
//! let store = RecordStoreBuilder::new("/data/Global_Annual_PM2.5.csv").build()?;
//!
//! let id = store.insert(RecordFields::new(-179.1, 68.0, 2.8))?;
//! store.update(id, RecordFields::default().with("PM2.5_Level", 3.1))?;
//!
//! let arctic = store.filter(&RecordFilter::new(Some(68.0), None));
//! let stats = store.stats();
//! println!("{} records, average PM2.5 {:?}", stats.count, stats.average);
//! ```
//!
//! ## Dataset Format
//!
//! A CSV file whose header contains `Longitude`, `Latitude` and `PM2.5_Level`.
//! Other columns are kept as extra columns; empty cells are null.

pub mod dataset;
pub mod error;
pub mod filter;
pub mod record;
pub mod stats;
pub mod store;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use error::{Result, StoreError};
pub use filter::RecordFilter;
pub use record::{CellValue, ExtraColumns, Record, RecordFields, Schema};
pub use stats::PmStats;
pub use store::{RecordStore, RecordStoreBuilder};
