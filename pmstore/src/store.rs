//! The in-memory record store.
//!
//! This module provides [`RecordStore`], the single owned table of PM2.5
//! measurements, and [`RecordStoreBuilder`] for loading it from a dataset.
//!
//! ```ignore
//! use pmstore::{RecordFields, RecordStoreBuilder};
//!
//! let store = RecordStoreBuilder::new("/data/pm25.csv").build()?;
//!
//! let id = store.insert(RecordFields::new(-179.1, 68.0, 2.8))?;
//! let record = store.get(id)?;
//! println!("PM2.5 at Id {}: {:?}", id, record.pm25_level);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::dataset::load_csv;
use crate::error::{Result, StoreError};
use crate::filter::RecordFilter;
use crate::record::{Record, RecordFields, Schema};
use crate::stats::PmStats;

/// Records keyed by Id.
///
/// New Ids are always greater than every existing one, so ascending key
/// order is also insertion order.
type Table = BTreeMap<u64, Record>;

/// Thread-safe in-memory table of measurements.
///
/// Every operation takes the table lock once, so no caller can observe a
/// partially applied write and concurrent inserts never share an Id.
///
/// # Example
///
/// ```ignore
/// use pmstore::{RecordFilter, RecordStore};
///
/// let store = RecordStore::new();
/// let id = store.insert(pmstore::RecordFields::new(-179.1, 68.0, 2.8))?;
/// assert_eq!(id, 0);
///
/// let arctic = store.filter(&RecordFilter::new(Some(68.0), None));
/// let stats = store.stats();
/// ```
#[derive(Debug)]
pub struct RecordStore {
    /// Recognized columns.
    schema: Schema,
    /// The table itself.
    table: RwLock<Table>,
    /// File the table was loaded from, if any.
    data_file: Option<PathBuf>,
}

impl RecordStore {
    /// Create an empty store with only the core columns.
    pub fn new() -> Self {
        Self::with_schema(Schema::default())
    }

    /// Create an empty store with the given columns.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            table: RwLock::new(Table::new()),
            data_file: None,
        }
    }

    /// Create a store holding `records`.
    ///
    /// Records keep their Ids; a later record with a duplicate Id replaces the
    /// earlier one.
    pub fn from_records(schema: Schema, records: Vec<Record>) -> Self {
        let table = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            schema,
            table: RwLock::new(table),
            data_file: None,
        }
    }

    /// Create a builder that loads the table from a CSV file.
    pub fn builder<P: AsRef<Path>>(data_file: P) -> RecordStoreBuilder {
        RecordStoreBuilder::new(data_file)
    }

    /// Every record, in table order.
    pub fn list_all(&self) -> Vec<Record> {
        self.read().values().cloned().collect()
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this Id.
    pub fn get(&self, id: u64) -> Result<Record> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    /// Insert a new record and return its Id.
    ///
    /// The Id is one more than the largest Id in the table, or 0 when the
    /// table is empty. Unrecognized keys in `fields` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] if `Longitude`, `Latitude` or
    /// `PM2.5_Level` is missing. The table is left unchanged.
    pub fn insert(&self, fields: RecordFields) -> Result<u64> {
        let missing = fields.missing_required();
        if !missing.is_empty() {
            return Err(StoreError::InvalidInput { missing });
        }

        let mut table = self.write();
        let id = next_id(&table);
        table.insert(id, Record::from_fields(id, fields, &self.schema));
        Ok(id)
    }

    /// Overwrite the recognized columns named in `fields` and return the
    /// updated record.
    ///
    /// Unrecognized keys are ignored and the Id never changes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this Id.
    pub fn update(&self, id: u64, fields: RecordFields) -> Result<Record> {
        let mut table = self.write();
        let record = table.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        record.apply(fields, &self.schema);
        Ok(record.clone())
    }

    /// Remove a record and return it as it was.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this Id.
    pub fn delete(&self, id: u64) -> Result<Record> {
        self.write()
            .remove(&id)
            .ok_or(StoreError::NotFound { id })
    }

    /// Records matching `filter`, in table order.
    pub fn filter(&self, filter: &RecordFilter) -> Vec<Record> {
        if filter.is_empty() {
            return self.list_all();
        }
        self.read()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Statistics over the `PM2.5_Level` column.
    pub fn stats(&self) -> PmStats {
        PmStats::from_levels(self.read().values().filter_map(|r| r.pm25_level))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Recognized columns.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Path of the dataset the table was loaded from.
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    // Every write is a single map operation, so a poisoned lock still guards
    // a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn next_id(table: &Table) -> u64 {
    table.keys().next_back().map_or(0, |max| max + 1)
}

/// Builder for loading a [`RecordStore`] from a dataset file.
///
/// # Example
///
/// ```ignore
/// use pmstore::RecordStoreBuilder;
///
/// let store = RecordStoreBuilder::from_env()?.build()?;
/// println!("Loaded {} records", store.len());
/// ```
#[derive(Debug, Clone)]
pub struct RecordStoreBuilder {
    data_file: PathBuf,
}

impl RecordStoreBuilder {
    /// Create a builder for the given CSV file.
    pub fn new<P: AsRef<Path>>(data_file: P) -> Self {
        Self {
            data_file: data_file.as_ref().to_path_buf(),
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PMSTORE_DATA_FILE` | CSV dataset to load | Required |
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingDataFile`] if `PMSTORE_DATA_FILE` is not set.
    pub fn from_env() -> Result<Self> {
        let data_file =
            std::env::var("PMSTORE_DATA_FILE").map_err(|_| StoreError::MissingDataFile)?;
        Ok(Self::new(data_file))
    }

    /// Set the dataset file.
    ///
    /// Overrides the file set in the constructor or from environment.
    pub fn data_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_file = path.as_ref().to_path_buf();
        self
    }

    /// Load the dataset and build the [`RecordStore`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn build(self) -> Result<RecordStore> {
        let (schema, records) = load_csv(&self.data_file)?;
        let mut store = RecordStore::from_records(schema, records);
        store.data_file = Some(self.data_file);
        Ok(store)
    }
}
