use anyhow::Result;
use std::path::PathBuf;

use super::{load_store, print_records};

pub fn run(data_file: Option<PathBuf>, json: bool) -> Result<()> {
    let store = load_store(data_file)?;
    print_records(store.schema(), &store.list_all(), json)
}
