//! Command-line interface definitions

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "importer-cli")]
#[command(about = "Guided CSV import wizard for catalog data", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the importable destination tables
    Tables,

    /// Write the CSV template for a destination table
    Template {
        /// Destination table id (see `tables`)
        table: String,

        /// Output path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the import wizard end to end against the demo backend
    Run {
        /// Path to the CSV file to import
        file: PathBuf,

        /// Destination table id (see `tables`)
        #[arg(short, long)]
        table: String,

        /// How rows are applied: 'update' or 'replace'
        #[arg(short, long, default_value = "update")]
        import_type: String,

        /// Flip an advanced option (skip-header, strict-validation,
        /// send-notification); repeatable
        #[arg(long = "toggle", value_name = "OPTION")]
        toggles: Vec<String>,

        /// CSV delimiter declared to the backend
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Expected file encoding
        #[arg(long, default_value = "UTF-8")]
        encoding: String,

        /// Seed for the demo backend, for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Print the final outcome as JSON instead of the report
        #[arg(long)]
        json: bool,

        /// Write the error details report (CSV) to this path
        #[arg(long, value_name = "PATH")]
        errors_report: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}
