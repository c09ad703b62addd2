//! Append-only TSV writer for merged records

use crate::error::Result;
use crate::joiner::MergedRecord;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Marker emitted for any field absent from its source
pub const UNKNOWN_MARKER: &str = "unknown";

/// Report columns, in output order
pub const COLUMNS: [&str; 11] = [
    "pmid",
    "citation_count",
    "title",
    "author_count",
    "journal",
    "relative_citation_ratio",
    "citations_per_year",
    "expected_citations_per_year",
    "field_citation_rate",
    "is_research_article",
    "year",
];

/// Writes merged records to a TSV file, one line per identifier.
///
/// Records are written once and never rewritten; re-running a harvest into
/// the same path starts a fresh report.
pub struct ReportWriter {
    writer: BufWriter<File>,
    records_written: usize,
}

impl ReportWriter {
    /// Create (truncate) the report file, creating parent directories
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            records_written: 0,
        })
    }

    /// Write the header row
    pub fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "{}", COLUMNS.join("\t"))?;
        Ok(())
    }

    /// Append one merged record
    pub fn write_record(&mut self, record: &MergedRecord) -> Result<()> {
        writeln!(self.writer, "{}", render_line(record))?;
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush buffered output to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Render one merged record as a TSV line, columns in [`COLUMNS`] order.
///
/// Deterministic for a fixed record, so re-running a join over the same
/// inputs produces byte-identical output.
pub fn render_line(record: &MergedRecord) -> String {
    let fields = [
        record.pmid.clone(),
        field(record.citation_count),
        text_field(record.title.as_deref()),
        field(record.author_count),
        text_field(record.journal.as_deref()),
        field(record.relative_citation_ratio),
        field(record.citations_per_year),
        field(record.expected_citations_per_year),
        field(record.field_citation_rate),
        field(record.is_research_article),
        field(record.year),
    ];
    fields.join("\t")
}

/// Render an optional scalar, absent values as the unknown marker
fn field<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNKNOWN_MARKER.to_string(), |v| v.to_string())
}

/// Render an optional text field with whitespace collapsed to underscores,
/// keeping titles and journal names single-token in the TSV
fn text_field(value: Option<&str>) -> String {
    match value {
        Some(text) => text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_"),
        None => UNKNOWN_MARKER.to_string(),
    }
}
