//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Publication metadata harvester CLI
#[derive(Parser, Debug)]
#[command(name = "pubharvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full harvest and write the TSV report
    Run {
        /// Search term (overrides the config file)
        #[arg(short, long)]
        term: Option<String>,

        /// Restrict to a single publication year (sets mindate and maxdate)
        #[arg(short, long)]
        year: Option<String>,

        /// Identifiers requested per page
        #[arg(long)]
        page_size: Option<u64>,

        /// Stop after this many records
        #[arg(long)]
        max_records: Option<usize>,

        /// Report output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// API key forwarded on search/detail requests
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Report the total record count and page count for a query
    Count {
        /// Search term (overrides the config file)
        #[arg(short, long)]
        term: Option<String>,

        /// Restrict to a single publication year (sets mindate and maxdate)
        #[arg(short, long)]
        year: Option<String>,

        /// Identifiers requested per page
        #[arg(long)]
        page_size: Option<u64>,
    },

    /// Validate a configuration file
    Validate,
}
