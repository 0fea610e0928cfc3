use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::index::ScanMode;
use crate::models::Variable;

#[derive(Parser)]
#[command(name = "basmati-atlas")]
#[command(about = "Weather, market and quality data browser for Basmati-growing regions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Config file [default: ./basmati-atlas.toml]")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split the master weather table into per-region Rainfall and Temperature CSVs
    Split {
        #[arg(
            short,
            long,
            help = "Master CSV (State,District,Block,Date,Rainfall,Max_Temperature,Min_Temperature)"
        )]
        input: PathBuf,

        #[arg(short, long, help = "Output directory [default: configured Met directory]")]
        output_dir: Option<PathBuf>,
    },

    /// List what a data directory holds, decoded from its filenames or manifest
    Index {
        #[arg(short, long)]
        dir: PathBuf,

        #[arg(short, long, default_value = "csv", help = "csv, image or quality")]
        mode: ScanMode,

        #[arg(long, help = "Print the index as JSON")]
        json: bool,
    },

    /// Write an index.json manifest for a data directory
    Manifest {
        #[arg(short, long)]
        dir: PathBuf,

        #[arg(short, long, default_value = "csv", help = "csv, image or quality")]
        mode: ScanMode,
    },

    /// Prepare chart data for one region
    Chart {
        #[arg(
            short,
            long,
            help = "Master CSV or directory of split files [default: configured Met directory]"
        )]
        source: Option<PathBuf>,

        #[arg(long)]
        state: String,

        #[arg(long, help = "Composite District-Block key, e.g. Amritsar-Ajnala")]
        district_block: String,

        #[arg(
            long,
            value_delimiter = ',',
            default_value = "rainfall,max-temperature,min-temperature"
        )]
        variables: Vec<Variable>,

        #[arg(long, help = "Only include years >= SINCE")]
        since: Option<i32>,

        #[arg(long, help = "Print chart data as JSON")]
        json: bool,
    },

    /// Prepare chart data for a generic meteorological-variable CSV
    Variable {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, help = "Only include years >= SINCE")]
        since: Option<i32>,

        #[arg(long, help = "Print chart data as JSON")]
        json: bool,
    },

    /// Check a master CSV for invalid, duplicate or inconsistent rows
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },
}
