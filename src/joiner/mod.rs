//! Two-source batch join
//!
//! For each page of identifiers the joiner fetches the detail and metrics
//! mappings concurrently, then pairs them strictly by identifier key in the
//! page's order. Positional pairing of the two response lists misaligns as
//! soon as either source has a gap, so it is never used here. A failed fetch
//! degrades to an empty mapping with a logged warning; the merge proceeds
//! with "unknown" placeholders instead of dropping the batch.

mod types;


pub use types::{
    DetailRecord, DetailSource, JoinedPage, MergedRecord, MetricsRecord, MetricsSource,
};

use crate::pager::Pmid;
use std::collections::HashMap;
use tracing::warn;

/// Joins identifier pages against a detail source and a metrics source
pub struct Joiner<D: DetailSource, M: MetricsSource> {
    details: D,
    metrics: M,
}

impl<D: DetailSource, M: MetricsSource> Joiner<D, M> {
    /// Create a joiner over the two sources
    pub fn new(details: D, metrics: M) -> Self {
        Self { details, metrics }
    }

    /// Fetch both mappings for a batch and merge them.
    ///
    /// The two fetches run concurrently; both complete (or are marked
    /// failed) before the merge. Source failures are non-fatal.
    pub async fn join_page(&self, ids: &[Pmid]) -> JoinedPage {
        let (details, metrics) = futures::future::join(
            self.details.fetch_details(ids),
            self.metrics.fetch_metrics(ids),
        )
        .await;

        let (details, detail_failed) = match details {
            Ok(map) => (map, false),
            Err(e) => {
                warn!(batch = ids.len(), error = %e, "detail fetch failed for batch");
                (HashMap::new(), true)
            }
        };
        let (metrics, metrics_failed) = match metrics {
            Ok(map) => (map, false),
            Err(e) => {
                warn!(batch = ids.len(), error = %e, "metrics fetch failed for batch");
                (HashMap::new(), true)
            }
        };

        let records = merge(ids, &details, &metrics);
        let missing_details = records.iter().filter(|r| !r.has_detail).count();
        let missing_metrics = records.iter().filter(|r| !r.has_metrics).count();

        if missing_details > 0 || missing_metrics > 0 {
            warn!(
                batch = ids.len(),
                missing_details, missing_metrics, "partial join for batch"
            );
        }

        JoinedPage {
            records,
            missing_details,
            missing_metrics,
            detail_failed,
            metrics_failed,
        }
    }
}

/// Pair identifiers with their detail and metrics records, by key.
///
/// Output order is exactly the input identifier order, independent of the
/// iteration order of either mapping. Deterministic for fixed inputs.
pub fn merge(
    ids: &[Pmid],
    details: &HashMap<Pmid, DetailRecord>,
    metrics: &HashMap<Pmid, MetricsRecord>,
) -> Vec<MergedRecord> {
    ids.iter()
        .map(|id| MergedRecord::from_parts(id, details.get(id), metrics.get(id)))
        .collect()
}
