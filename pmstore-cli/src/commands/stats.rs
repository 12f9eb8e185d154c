use anyhow::Result;
use pmstore::PmStats;
use std::path::PathBuf;

use super::load_store;

pub fn run(data_file: Option<PathBuf>, json: bool) -> Result<()> {
    let store = load_store(data_file)?;
    let stats = store.stats();

    if json {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        print!("{}", render(&stats, store.len()));
    }

    Ok(())
}

fn render(stats: &PmStats, records: usize) -> String {
    let mut out = format!(
        "PM2.5 statistics:\n  Records: {}\n  Levels:  {}\n",
        records, stats.count
    );

    if !stats.has_data() {
        out.push_str("  No data\n");
        return out;
    }

    let show = |value: Option<f64>| value.map_or_else(String::new, |v| format!("{:.3}", v));
    out.push_str(&format!("  Average: {}\n", show(stats.average)));
    out.push_str(&format!("  Max:     {}\n", show(stats.max)));
    out.push_str(&format!("  Min:     {}\n", show(stats.min)));
    out
}
