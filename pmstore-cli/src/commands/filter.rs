use anyhow::Result;
use pmstore::RecordFilter;
use std::path::PathBuf;

use super::{load_store, print_records};

pub fn run(
    data_file: Option<PathBuf>,
    lat: Option<f64>,
    long: Option<f64>,
    json: bool,
) -> Result<()> {
    let store = load_store(data_file)?;
    let records = store.filter(&RecordFilter::new(lat, long));
    print_records(store.schema(), &records, json)
}
