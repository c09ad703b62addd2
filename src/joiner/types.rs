//! Joiner record types and source traits

use crate::error::Result;
use crate::pager::Pmid;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Records
// ============================================================================

/// Per-identifier fields from the detail source (efetch XML)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Number of listed authors (investigator list preferred when present)
    pub author_count: Option<u32>,
    /// Article title
    pub title: Option<String>,
}

/// Per-identifier fields from the metrics source (iCite)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub citation_count: Option<u64>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub relative_citation_ratio: Option<f64>,
    pub citations_per_year: Option<f64>,
    pub expected_citations_per_year: Option<f64>,
    pub field_citation_rate: Option<f64>,
    pub is_research_article: Option<bool>,
    pub year: Option<i32>,
}

/// One identifier paired with fields from both sources.
///
/// Fields absent from either source stay `None` and are rendered with an
/// explicit "unknown" marker at output time, never silently omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub pmid: Pmid,
    pub citation_count: Option<u64>,
    pub title: Option<String>,
    pub author_count: Option<u32>,
    pub journal: Option<String>,
    pub relative_citation_ratio: Option<f64>,
    pub citations_per_year: Option<f64>,
    pub expected_citations_per_year: Option<f64>,
    pub field_citation_rate: Option<f64>,
    pub is_research_article: Option<bool>,
    pub year: Option<i32>,
    /// Whether the detail source had this identifier
    pub has_detail: bool,
    /// Whether the metrics source had this identifier
    pub has_metrics: bool,
}

impl MergedRecord {
    /// Pair one identifier with whatever each source had for it
    pub fn from_parts(
        pmid: &Pmid,
        detail: Option<&DetailRecord>,
        metrics: Option<&MetricsRecord>,
    ) -> Self {
        Self {
            pmid: pmid.clone(),
            citation_count: metrics.and_then(|m| m.citation_count),
            // The metrics source is authoritative for the title; fall back to
            // the detail record when it has nothing.
            title: metrics
                .and_then(|m| m.title.clone())
                .or_else(|| detail.and_then(|d| d.title.clone())),
            author_count: detail.and_then(|d| d.author_count),
            journal: metrics.and_then(|m| m.journal.clone()),
            relative_citation_ratio: metrics.and_then(|m| m.relative_citation_ratio),
            citations_per_year: metrics.and_then(|m| m.citations_per_year),
            expected_citations_per_year: metrics.and_then(|m| m.expected_citations_per_year),
            field_citation_rate: metrics.and_then(|m| m.field_citation_rate),
            is_research_article: metrics.and_then(|m| m.is_research_article),
            year: metrics.and_then(|m| m.year),
            has_detail: detail.is_some(),
            has_metrics: metrics.is_some(),
        }
    }
}

// ============================================================================
// Join result
// ============================================================================

/// One joined page plus its partial-data accounting
#[derive(Debug, Clone, Default)]
pub struct JoinedPage {
    /// Merged records, in input identifier order
    pub records: Vec<MergedRecord>,
    /// Identifiers absent from the detail mapping
    pub missing_details: usize,
    /// Identifiers absent from the metrics mapping
    pub missing_metrics: usize,
    /// The detail fetch failed outright for this batch
    pub detail_failed: bool,
    /// The metrics fetch failed outright for this batch
    pub metrics_failed: bool,
}

impl JoinedPage {
    /// Check whether any identifier could not be joined from one source
    pub fn is_partial(&self) -> bool {
        self.missing_details > 0 || self.missing_metrics > 0
    }
}

// ============================================================================
// Source traits
// ============================================================================

/// Batch detail lookup keyed by identifier
#[async_trait]
pub trait DetailSource: Send + Sync {
    /// Fetch detail records for a batch; identifiers the source does not
    /// know are simply absent from the mapping
    async fn fetch_details(&self, ids: &[Pmid]) -> Result<HashMap<Pmid, DetailRecord>>;
}

/// Batch metrics lookup keyed by identifier
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch metrics records for a batch; identifiers the source does not
    /// know are simply absent from the mapping
    async fn fetch_metrics(&self, ids: &[Pmid]) -> Result<HashMap<Pmid, MetricsRecord>>;
}
