//! TSV report output
//!
//! Merged records are persisted as an append-only tab-separated report:
//! one header row, one line per identifier, fixed column order, explicit
//! `unknown` marker for fields absent from either source.

mod writer;

#[cfg(test)]
mod tests;

pub use writer::{render_line, ReportWriter, COLUMNS, UNKNOWN_MARKER};
