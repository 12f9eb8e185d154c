pub mod export;
pub mod filter;
pub mod get;
pub mod list;
pub mod stats;

use anyhow::{Context, Result};
use pmstore::{CellValue, Record, RecordStore, RecordStoreBuilder, Schema};
use std::path::PathBuf;

/// Load the dataset named on the command line or in `PMSTORE_DATA_FILE`.
pub fn load_store(data_file: Option<PathBuf>) -> Result<RecordStore> {
    let builder = match data_file {
        Some(path) => RecordStoreBuilder::new(path),
        None => RecordStoreBuilder::from_env().context(
            "PMSTORE_DATA_FILE environment variable not set. Use --data-file or set PMSTORE_DATA_FILE",
        )?,
    };

    builder.build().context("Failed to load dataset")
}

/// Print records either as a JSON array or as an aligned table.
pub fn print_records(schema: &Schema, records: &[Record], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No records found");
        return Ok(());
    }

    let mut header = format!("{:>8}", "Id");
    for column in schema.columns() {
        header.push_str(&format!(" {:>14}", column));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for record in records {
        let mut line = format!("{:>8}", record.id);
        for column in schema.columns() {
            line.push_str(&format!(" {:>14}", format_cell(&record.value(column))));
        }
        println!("{}", line);
    }

    println!();
    println!("{} record(s)", records.len());
    Ok(())
}

/// Render a cell for table output.
pub fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => "-".to_string(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Text(s) => s.clone(),
    }
}
