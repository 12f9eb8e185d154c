use anyhow::{bail, Context, Result};
use pmstore::{
    dataset::write_csv, geojson::records_to_feature_collection, Record, RecordFilter, Schema,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::load_store;

pub fn run(
    data_file: Option<PathBuf>,
    output: PathBuf,
    lat: Option<f64>,
    long: Option<f64>,
) -> Result<()> {
    let store = load_store(data_file)?;
    let records = store.filter(&RecordFilter::new(lat, long));

    write_records(store.schema(), &records, &output)?;

    println!(
        "Wrote {} record(s) to: {}",
        records.len(),
        output.display()
    );
    Ok(())
}

/// Write records to `output`, choosing the format from its extension.
fn write_records(schema: &Schema, records: &[Record], output: &Path) -> Result<()> {
    // Detect file format
    let extension = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let file = match extension.as_str() {
        "csv" | "geojson" | "json" => {
            File::create(output).context("Failed to create output file")?
        }
        _ => bail!(
            "Unsupported file format: {}. Use .csv or .geojson",
            extension
        ),
    };
    let mut writer = BufWriter::new(file);

    if extension == "csv" {
        write_csv(schema, records, &mut writer).context("Failed to write CSV")?;
    } else {
        let document =
            geojson::GeoJson::FeatureCollection(records_to_feature_collection(records));
        serde_json::to_writer_pretty(&mut writer, &document)
            .context("Failed to write GeoJSON")?;
    }

    writer.flush()?;
    Ok(())
}
