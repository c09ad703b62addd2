//! Pager types and the search-source trait
//!
//! The search API sits behind [`SearchSource`] so the pager can be exercised
//! against mocks and the vendor client stays an injectable collaborator.

use crate::config::QueryConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Opaque identifier for one publication within the search source's namespace
pub type Pmid = String;

/// Continuation cursor returned by the search source.
///
/// An environment token plus a query key. The source returns a (possibly
/// updated) cursor with every response; pagination is only consistent when
/// each request carries the cursor from the immediately preceding response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Environment token ("WebEnv")
    pub web_env: String,
    /// Query key within that environment
    pub query_key: String,
}

impl Cursor {
    /// Create a new cursor
    pub fn new(web_env: impl Into<String>, query_key: impl Into<String>) -> Self {
        Self {
            web_env: web_env.into(),
            query_key: query_key.into(),
        }
    }

    /// A cursor with empty fields cannot be used for continuation
    pub fn is_usable(&self) -> bool {
        !self.web_env.is_empty() && !self.query_key.is_empty()
    }
}

/// Result of the initial counting request
#[derive(Debug, Clone)]
pub struct SearchInit {
    /// Total number of records matching the query
    pub total: u64,
    /// Cursor to carry into the first page request
    pub cursor: Cursor,
}

/// One raw page from the search source
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Ordered identifiers in this slice
    pub ids: Vec<Pmid>,
    /// Cursor supplied in this same response, to be used on the next request
    pub cursor: Cursor,
}

/// Outcome of fetching one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// Page fetched normally (an empty id list is a legitimately empty page)
    Fetched,
    /// Upstream returned a malformed response or timed out; ids are empty
    Failed {
        /// Human-readable failure reason, surfaced as a warning
        reason: String,
    },
}

impl PageStatus {
    /// Check whether this page failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One page of identifiers plus progress bookkeeping
#[derive(Debug, Clone)]
pub struct IdPage {
    /// Ordered identifiers (length ≤ requested page size)
    pub ids: Vec<Pmid>,
    /// Zero-based page index
    pub index: u64,
    /// Completion fraction: pages done / total pages, in 0..=1
    pub progress: f64,
    /// Fetched or failed
    pub status: PageStatus,
}

/// The remote search API behind the pager.
///
/// `count` establishes the result-set size and the initial cursor; `page`
/// retrieves one slice using the caller-supplied cursor and returns the
/// cursor from that same response.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Issue the counting request for a query
    async fn count(&self, query: &QueryConfig) -> Result<SearchInit>;

    /// Fetch one slice of identifiers
    async fn page(
        &self,
        query: &QueryConfig,
        cursor: &Cursor,
        offset: u64,
        limit: u64,
    ) -> Result<SearchPage>;
}
