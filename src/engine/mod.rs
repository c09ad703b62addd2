//! Main harvest engine
//!
//! Composes config → sources → pager → joiner → report writer. Pages are
//! processed strictly one at a time (the cursor chain is sequential); within
//! a page the detail and metrics fetches run concurrently inside the joiner.
//! Failures below initialization are warnings, not aborts.

mod types;


pub use types::HarvestStats;

use crate::config::HarvestConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::joiner::{DetailSource, Joiner, MetricsSource};
use crate::pager::{PageStatus, Pager, SearchSource};
use crate::report::ReportWriter;
use crate::sources::{EntrezClient, IciteClient};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Orchestrates one harvest run
pub struct HarvestEngine<S: SearchSource, D: DetailSource, M: MetricsSource> {
    config: HarvestConfig,
    pager: Pager<S>,
    joiner: Joiner<D, M>,
}

impl HarvestEngine<EntrezClient, EntrezClient, IciteClient> {
    /// Build an engine over the real remote sources
    pub fn from_config(config: HarvestConfig) -> Result<Self> {
        config.validate()?;

        let http = Arc::new(HttpClient::with_config(HttpClientConfig::from(&config.http)));
        let entrez = EntrezClient::new(
            Arc::clone(&http),
            &config.endpoints,
            config.contact.clone(),
            config.api_key.clone(),
        );
        let icite = IciteClient::new(http, &config.endpoints);

        let pager = Pager::new(entrez.clone(), config.query.clone(), config.page_size);
        let joiner = Joiner::new(entrez, icite);

        Ok(Self {
            config,
            pager,
            joiner,
        })
    }
}

impl<S: SearchSource, D: DetailSource, M: MetricsSource> HarvestEngine<S, D, M> {
    /// Build an engine over caller-supplied sources
    pub fn new(config: HarvestConfig, search: S, details: D, metrics: M) -> Self {
        let pager = Pager::new(search, config.query.clone(), config.page_size);
        let joiner = Joiner::new(details, metrics);
        Self {
            config,
            pager,
            joiner,
        }
    }

    /// Initialize only: report the total count and page count for the query
    pub async fn count(mut self) -> Result<(u64, u64)> {
        let total = self.pager.initialize().await?;
        Ok((total, self.pager.pages_total()))
    }

    /// Run the full harvest: paginate, join each page, append to the report
    pub async fn run(mut self) -> Result<HarvestStats> {
        let start = Instant::now();
        let mut stats = HarvestStats::default();

        let total = self.pager.initialize().await?;
        stats.total_count = total;
        info!(
            total,
            pages = self.pager.pages_total(),
            page_size = self.config.page_size,
            "search initialized"
        );

        let mut writer = ReportWriter::create(&self.config.output)?;
        writer.write_header()?;

        'pages: while let Some(page) = self.pager.next_page().await? {
            stats.pages_fetched += 1;

            if let PageStatus::Failed { reason } = &page.status {
                warn!(page = page.index, %reason, "skipping failed page");
                stats.pages_failed += 1;
                continue;
            }
            if page.ids.is_empty() {
                continue;
            }

            let joined = self.joiner.join_page(&page.ids).await;
            stats.missing_details += joined.missing_details;
            stats.missing_metrics += joined.missing_metrics;
            if joined.detail_failed || joined.metrics_failed {
                stats.batches_degraded += 1;
            }

            for record in &joined.records {
                writer.write_record(record)?;
                stats.records_written += 1;
                if self.config.max_records > 0 && stats.records_written >= self.config.max_records
                {
                    info!(cap = self.config.max_records, "record cap reached");
                    break 'pages;
                }
            }

            info!(
                page = page.index,
                records = joined.records.len(),
                progress_pct = page.progress * 100.0,
                "page joined"
            );
        }

        writer.flush()?;
        stats.elapsed = start.elapsed();
        info!("{}", stats.summary());
        Ok(stats)
    }
}
