//! CLI module
//!
//! Command-line interface for running harvests.
//!
//! # Commands
//!
//! - `run` - Execute a full harvest and write the TSV report
//! - `count` - Report the total record and page count for a query
//! - `validate` - Validate a configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
