use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{format_cell, load_store};

pub fn run(data_file: Option<PathBuf>, id: u64, json: bool) -> Result<()> {
    let store = load_store(data_file)?;
    let record = store
        .get(id)
        .with_context(|| format!("No record with Id {}", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{:<14} {}", "Id", record.id);
    for column in store.schema().columns() {
        println!("{:<14} {}", column, format_cell(&record.value(column)));
    }

    Ok(())
}
