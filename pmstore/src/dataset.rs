//! CSV dataset loading and writing.
//!
//! The dataset is a CSV file whose header must contain `Longitude`,
//! `Latitude` and `PM2.5_Level`. Any other header columns become extra
//! columns of the [`Schema`]. Rows are assigned Ids `0..n` in file order.
//!
//! ```text
//! Longitude,Latitude,PM2.5_Level
//! -179.1,68.0,2.8
//! -179.0,68.0,2.9
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::record::{CellValue, Record, Schema, LATITUDE, LONGITUDE, PM25_LEVEL};

/// Load a dataset from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a core column is missing
/// from the header, or a core cell is not a number.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<(Schema, Vec<Record>)> {
    let file = File::open(path.as_ref())?;
    read_csv(BufReader::new(file))
}

/// Read a dataset from any CSV source.
///
/// Empty cells are null. Core cells must parse as `f64`; extra cells become
/// numbers when they parse, text otherwise. An `Id` column in the header is
/// ignored since Ids are always assigned by position.
pub fn read_csv<R: Read>(reader: R) -> Result<(Schema, Vec<Record>)> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let position = |column: &'static str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or(StoreError::MissingColumn { column })
    };
    let lon_idx = position(LONGITUDE)?;
    let lat_idx = position(LATITUDE)?;
    let pm_idx = position(PM25_LEVEL)?;

    let schema = Schema::new(headers.iter().cloned());
    let extra_idx: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| schema.is_extra(h))
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let raw = result?;
        // Rows are reported 1-based, not counting the header
        let line = row + 1;

        let extra = extra_idx
            .iter()
            .map(|&(i, column)| {
                let value = raw.get(i).map(CellValue::parse).unwrap_or_default();
                (column.to_string(), value)
            })
            .collect();

        records.push(Record {
            id: row as u64,
            longitude: parse_core(raw.get(lon_idx), line, LONGITUDE)?,
            latitude: parse_core(raw.get(lat_idx), line, LATITUDE)?,
            pm25_level: parse_core(raw.get(pm_idx), line, PM25_LEVEL)?,
            extra,
        });
    }

    Ok((schema, records))
}

fn parse_core(cell: Option<&str>, row: usize, column: &str) -> Result<Option<f64>> {
    let raw = match cell.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| StoreError::InvalidValue {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// Write records as CSV: an `Id` column followed by every schema column.
///
/// Null values are written as empty cells, so the output can be loaded back
/// with [`read_csv`].
pub fn write_csv<W: Write>(schema: &Schema, records: &[Record], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = vec!["Id"];
    header.extend(schema.columns().iter().map(String::as_str));
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![record.id.to_string()];
        row.extend(schema.columns().iter().map(|c| match record.value(c) {
            CellValue::Null => String::new(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s,
        }));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
