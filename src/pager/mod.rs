//! Paginated identifier retrieval
//!
//! The pager turns a total record count and a page size into a sequence of
//! identifier pages. It owns the continuation cursor: every request carries
//! the cursor returned by the immediately preceding response, and the cursor
//! stored here is replaced on every successful page. A malformed or timed-out
//! page yields an empty identifier list with [`PageStatus::Failed`] rather
//! than aborting the sequence; only initialization failures and a dropped
//! cursor are fatal.

mod types;

#[cfg(test)]
mod tests;

pub use types::{Cursor, IdPage, PageStatus, Pmid, SearchInit, SearchPage, SearchSource};

use crate::config::QueryConfig;
use crate::error::{Error, Result};
use tracing::{debug, warn};

/// Drives offset/cursor pagination over a [`SearchSource`]
pub struct Pager<S: SearchSource> {
    source: S,
    query: QueryConfig,
    page_size: u64,
    total: Option<u64>,
    total_pages: u64,
    cursor: Option<Cursor>,
    fetched: u64,
    pages_done: u64,
}

impl<S: SearchSource> Pager<S> {
    /// Create a pager for a query
    pub fn new(source: S, query: QueryConfig, page_size: u64) -> Self {
        Self {
            source,
            query,
            page_size: page_size.max(1),
            total: None,
            total_pages: 0,
            cursor: None,
            fetched: 0,
            pages_done: 0,
        }
    }

    /// Issue the counting request and record the total plus initial cursor.
    ///
    /// Fatal on failure: without a parseable count and a usable cursor there
    /// is nothing to paginate.
    pub async fn initialize(&mut self) -> Result<u64> {
        let init = self.source.count(&self.query).await?;

        if !init.cursor.is_usable() {
            return Err(Error::cursor_protocol(
                "search source returned an empty continuation cursor",
            ));
        }

        self.total = Some(init.total);
        self.total_pages = init.total.div_ceil(self.page_size);
        self.cursor = Some(init.cursor);
        debug!(
            total = init.total,
            pages = self.total_pages,
            page_size = self.page_size,
            "pager initialized"
        );
        Ok(init.total)
    }

    /// Fetch the next page of identifiers.
    ///
    /// Returns `Ok(None)` once every record has been requested. The final
    /// page's requested size is clipped to the remainder, producing a short
    /// last page. Upstream failures for a single page are converted into an
    /// empty page with [`PageStatus::Failed`]; pagination continues.
    pub async fn next_page(&mut self) -> Result<Option<IdPage>> {
        let total = self
            .total
            .ok_or_else(|| Error::Other("pager used before initialize".to_string()))?;

        if self.fetched >= total {
            return Ok(None);
        }

        // Clip the last page to the remainder
        let limit = (total - self.fetched).min(self.page_size);
        let offset = self.fetched;
        let index = self.pages_done;

        let cursor = self
            .cursor
            .clone()
            .ok_or_else(|| Error::cursor_protocol("no continuation cursor available"))?;

        match self.source.page(&self.query, &cursor, offset, limit).await {
            Ok(page) => {
                if !page.cursor.is_usable() {
                    return Err(Error::cursor_protocol(
                        "search source dropped the continuation cursor mid-run",
                    ));
                }
                // Adopt the cursor from this response; the previous one is
                // stale from here on.
                self.cursor = Some(page.cursor);
                self.fetched += limit;
                self.pages_done += 1;

                let mut ids = page.ids;
                if ids.len() as u64 > limit {
                    ids.truncate(limit as usize);
                }

                Ok(Some(IdPage {
                    ids,
                    index,
                    progress: self.progress(),
                    status: PageStatus::Fetched,
                }))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(page = index, error = %e, "page fetch failed, yielding empty page");
                // The slice is consumed either way so the run can terminate.
                self.fetched += limit;
                self.pages_done += 1;
                Ok(Some(IdPage {
                    ids: Vec::new(),
                    index,
                    progress: self.progress(),
                    status: PageStatus::Failed {
                        reason: e.to_string(),
                    },
                }))
            }
        }
    }

    /// Completion fraction: pages done / total pages
    pub fn progress(&self) -> f64 {
        if self.total_pages == 0 {
            1.0
        } else {
            self.pages_done as f64 / self.total_pages as f64
        }
    }

    /// Total record count established by `initialize`
    pub fn total_count(&self) -> Option<u64> {
        self.total
    }

    /// Number of pages the run will produce
    pub fn pages_total(&self) -> u64 {
        self.total_pages
    }

    /// Identifiers requested so far
    pub fn fetched(&self) -> u64 {
        self.fetched
    }
}
