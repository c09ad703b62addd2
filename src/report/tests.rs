//! Tests for the report module

use super::*;
use crate::joiner::MergedRecord;
use pretty_assertions::assert_eq;

fn full_record() -> MergedRecord {
    MergedRecord {
        pmid: "23456789".to_string(),
        citation_count: Some(11),
        title: Some("Hospital volume is associated with outcomes".to_string()),
        author_count: Some(3),
        journal: Some("Cancer".to_string()),
        relative_citation_ratio: Some(1.543563),
        citations_per_year: Some(4.665397),
        expected_citations_per_year: Some(3.022486),
        field_citation_rate: Some(5.335023),
        is_research_article: Some(true),
        year: Some(2013),
        has_detail: true,
        has_metrics: true,
    }
}

fn empty_record() -> MergedRecord {
    MergedRecord {
        pmid: "42".to_string(),
        citation_count: None,
        title: None,
        author_count: None,
        journal: None,
        relative_citation_ratio: None,
        citations_per_year: None,
        expected_citations_per_year: None,
        field_citation_rate: None,
        is_research_article: None,
        year: None,
        has_detail: false,
        has_metrics: false,
    }
}

#[test]
fn test_render_line_full_record() {
    let line = render_line(&full_record());
    let fields: Vec<&str> = line.split('\t').collect();
    assert_eq!(fields.len(), COLUMNS.len());
    assert_eq!(fields[0], "23456789");
    assert_eq!(fields[1], "11");
    assert_eq!(fields[2], "Hospital_volume_is_associated_with_outcomes");
    assert_eq!(fields[3], "3");
    assert_eq!(fields[4], "Cancer");
    assert_eq!(fields[9], "true");
    assert_eq!(fields[10], "2013");
}

#[test]
fn test_render_line_unknown_markers() {
    let line = render_line(&empty_record());
    let fields: Vec<&str> = line.split('\t').collect();
    assert_eq!(fields[0], "42");
    for value in &fields[1..] {
        assert_eq!(*value, UNKNOWN_MARKER);
    }
}

#[test]
fn test_render_line_deterministic() {
    let record = full_record();
    assert_eq!(render_line(&record), render_line(&record));
}

#[test]
fn test_text_fields_never_contain_whitespace() {
    let mut record = full_record();
    record.title = Some("tabs\tand\nnewlines  and  runs".to_string());
    let line = render_line(&record);
    let fields: Vec<&str> = line.split('\t').collect();
    assert_eq!(fields.len(), COLUMNS.len());
    assert_eq!(fields[2], "tabs_and_newlines_and_runs");
}

#[test]
fn test_writer_header_and_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.tsv");

    let mut writer = ReportWriter::create(&path).unwrap();
    writer.write_header().unwrap();
    writer.write_record(&full_record()).unwrap();
    writer.write_record(&empty_record()).unwrap();
    writer.flush().unwrap();
    assert_eq!(writer.records_written(), 2);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], COLUMNS.join("\t"));
    assert!(lines[1].starts_with("23456789\t"));
    assert!(lines[2].starts_with("42\t"));
}

#[test]
fn test_writer_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out/report.tsv");

    let mut writer = ReportWriter::create(&path).unwrap();
    writer.write_header().unwrap();
    writer.flush().unwrap();

    assert!(path.exists());
}
