//! Engine statistics

use std::time::Duration;

/// Counters accumulated over one harvest run
#[derive(Debug, Clone, Default)]
pub struct HarvestStats {
    /// Total records the search reported for the query
    pub total_count: u64,
    /// Pages requested (including failed ones)
    pub pages_fetched: u64,
    /// Pages that yielded no identifiers because the upstream call failed
    pub pages_failed: u64,
    /// Merged records written to the report
    pub records_written: usize,
    /// Identifiers missing from the detail source across all batches
    pub missing_details: usize,
    /// Identifiers missing from the metrics source across all batches
    pub missing_metrics: usize,
    /// Batches where a whole source fetch failed and was degraded to empty
    pub batches_degraded: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl HarvestStats {
    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} records from {} pages ({} failed) in {:.1}s; {} missing details, {} missing metrics",
            self.records_written,
            self.pages_fetched,
            self.pages_failed,
            self.elapsed.as_secs_f64(),
            self.missing_details,
            self.missing_metrics,
        )
    }
}

impl std::fmt::Display for HarvestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}
