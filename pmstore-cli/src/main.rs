use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// PM2.5 measurement dataset CLI tool
#[derive(Parser)]
#[command(name = "pmstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV dataset to load
    #[arg(short, long, env = "PMSTORE_DATA_FILE", global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all records
    List {
        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show a single record by Id
    Get {
        /// Record Id
        id: u64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show records matching an exact latitude and/or longitude
    Filter {
        /// Latitude to match exactly
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to match exactly
        #[arg(long, allow_hyphen_values = true)]
        long: Option<f64>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show PM2.5 statistics
    Stats {
        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Write records to a CSV or GeoJSON file
    Export {
        /// Output file (.csv, .geojson or .json)
        output: PathBuf,

        /// Latitude to match exactly
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to match exactly
        #[arg(long, allow_hyphen_values = true)]
        long: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { json } => commands::list::run(cli.data_file, json),
        Commands::Get { id, json } => commands::get::run(cli.data_file, id, json),
        Commands::Filter { lat, long, json } => {
            commands::filter::run(cli.data_file, lat, long, json)
        }
        Commands::Stats { json } => commands::stats::run(cli.data_file, json),
        Commands::Export { output, lat, long } => {
            commands::export::run(cli.data_file, output, lat, long)
        }
    }
}
