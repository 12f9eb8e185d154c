//! Record model and column schema.
//!
//! A [`Record`] is one PM2.5 measurement. The three core columns
//! (`Longitude`, `Latitude`, `PM2.5_Level`) are typed fields; any other
//! columns found in the dataset header are carried as [`CellValue`]s in
//! [`ExtraColumns`], in header order.
//!
//! Request bodies are parsed into [`RecordFields`], where every column is
//! optional. The store decides which of those fields apply.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

/// Name of the identity column.
pub const ID: &str = "Id";
/// Name of the longitude column.
pub const LONGITUDE: &str = "Longitude";
/// Name of the latitude column.
pub const LATITUDE: &str = "Latitude";
/// Name of the PM2.5 level column.
pub const PM25_LEVEL: &str = "PM2.5_Level";

/// Columns every record must provide on insert.
pub const REQUIRED_COLUMNS: [&str; 3] = [LONGITUDE, LATITUDE, PM25_LEVEL];

/// A single cell of an extra column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing value.
    #[default]
    Null,
    /// Numeric value.
    Number(f64),
    /// Free-form text.
    Text(String),
}

impl CellValue {
    /// Parse a raw CSV cell. Empty cells are null, numeric cells are numbers,
    /// anything else is kept as text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Null
        } else if let Ok(n) = trimmed.parse::<f64>() {
            CellValue::Number(n)
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    /// Returns the numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(n: Option<f64>) -> Self {
        n.map_or(CellValue::Null, CellValue::Number)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// The ordered set of recognized columns.
///
/// Fixed once the table is loaded. Always contains the three core columns and
/// never contains the identity column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Build a schema from header names.
    ///
    /// `Id` and duplicate names are dropped. Core columns absent from `columns`
    /// are appended so every schema can hold a full record.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result: Vec<String> = Vec::new();
        for column in columns {
            let column = column.into();
            if column == ID || result.contains(&column) {
                continue;
            }
            result.push(column);
        }
        for core in REQUIRED_COLUMNS {
            if !result.iter().any(|c| c == core) {
                result.push(core.to_string());
            }
        }
        Self { columns: result }
    }

    /// All recognized columns, in dataset order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Recognized columns other than the core ones.
    pub fn extra_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !REQUIRED_COLUMNS.contains(c))
    }

    /// Whether `column` is a recognized column.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Whether `column` is a recognized non-core column.
    pub fn is_extra(&self, column: &str) -> bool {
        !REQUIRED_COLUMNS.contains(&column) && self.contains(column)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(REQUIRED_COLUMNS)
    }
}

/// Extra column values of a record, in schema order.
///
/// Serializes as a map whose keys keep that order, so responses list extra
/// columns the way the dataset header does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraColumns(Vec<(String, CellValue)>);

impl ExtraColumns {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `column`, if present.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Set `column`. A new column is appended after the existing ones.
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((column, value)),
        }
    }

    /// Column names, in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for ExtraColumns {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        let mut extra = Self::new();
        for (column, value) in iter {
            extra.insert(column, value);
        }
        extra
    }
}

impl<'a> IntoIterator for &'a ExtraColumns {
    type Item = &'a (String, CellValue);
    type IntoIter = std::slice::Iter<'a, (String, CellValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ExtraColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(c, v)| (c, v)))
    }
}

/// One measurement row.
///
/// Serializes as a flat object: `Id`, the core columns, then the extra
/// columns in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Synthetic key assigned by the store.
    #[serde(rename = "Id")]
    pub id: u64,
    /// Longitude in decimal degrees.
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    /// Latitude in decimal degrees.
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    /// PM2.5 concentration.
    #[serde(rename = "PM2.5_Level")]
    pub pm25_level: Option<f64>,
    /// Values of the extra columns.
    #[serde(flatten)]
    pub extra: ExtraColumns,
}

impl Record {
    /// Create a record with only the core columns set.
    pub fn new(id: u64, longitude: f64, latitude: f64, pm25_level: f64) -> Self {
        Self {
            id,
            longitude: Some(longitude),
            latitude: Some(latitude),
            pm25_level: Some(pm25_level),
            extra: ExtraColumns::new(),
        }
    }

    /// Value of a column by name. Unknown columns read as null.
    pub fn value(&self, column: &str) -> CellValue {
        match column {
            ID => CellValue::Number(self.id as f64),
            LONGITUDE => self.longitude.into(),
            LATITUDE => self.latitude.into(),
            PM25_LEVEL => self.pm25_level.into(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }

    /// Build a record for insertion. Extra columns not in `fields` are null.
    pub(crate) fn from_fields(id: u64, fields: RecordFields, schema: &Schema) -> Self {
        let mut record = Self {
            id,
            longitude: None,
            latitude: None,
            pm25_level: None,
            extra: schema
                .extra_columns()
                .map(|c| (c.to_string(), CellValue::Null))
                .collect(),
        };
        record.apply(fields, schema);
        record
    }

    /// Overwrite the columns named in `fields`. Keys that are not recognized
    /// columns are ignored.
    pub(crate) fn apply(&mut self, fields: RecordFields, schema: &Schema) {
        if let Some(v) = fields.longitude {
            self.longitude = Some(v);
        }
        if let Some(v) = fields.latitude {
            self.latitude = Some(v);
        }
        if let Some(v) = fields.pm25_level {
            self.pm25_level = Some(v);
        }
        for (column, value) in fields.extra {
            if schema.is_extra(&column) {
                self.extra.insert(column, value);
            }
        }
    }
}

/// Column values supplied by a client for insert or update.
///
/// Every column is optional here; [`RecordFields::missing_required`] reports
/// what an insert would be missing. Keys other than the core columns end up in
/// `extra`, including any client-supplied `Id`.
///
/// A JSON `null` for a core column deserializes to `None`, so on insert it
/// counts as missing and on update it leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(rename = "Longitude", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(rename = "Latitude", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(
        rename = "PM2.5_Level",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pm25_level: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, CellValue>,
}

impl RecordFields {
    /// Fields with all three core columns set.
    pub fn new(longitude: f64, latitude: f64, pm25_level: f64) -> Self {
        Self {
            longitude: Some(longitude),
            latitude: Some(latitude),
            pm25_level: Some(pm25_level),
            extra: BTreeMap::new(),
        }
    }

    /// Set an arbitrary column.
    ///
    /// Core column names are routed to their typed field; a non-numeric value
    /// for a core column clears it.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        let column = column.into();
        let value = value.into();
        match column.as_str() {
            LONGITUDE => self.longitude = value.as_f64(),
            LATITUDE => self.latitude = value.as_f64(),
            PM25_LEVEL => self.pm25_level = value.as_f64(),
            _ => {
                self.extra.insert(column, value);
            }
        }
        self
    }

    /// Required columns that are absent, in canonical order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.longitude.is_none() {
            missing.push(LONGITUDE);
        }
        if self.latitude.is_none() {
            missing.push(LATITUDE);
        }
        if self.pm25_level.is_none() {
            missing.push(PM25_LEVEL);
        }
        missing
    }
}
