//! Tests for the pager module

use super::*;
use crate::config::QueryConfig;
use crate::error::Error;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use test_case::test_case;

fn query() -> QueryConfig {
    QueryConfig {
        term: "2014".to_string(),
        mindate: "2014".to_string(),
        maxdate: "2014".to_string(),
        datetype: "pdat".to_string(),
    }
}

/// Recorded arguments of one page call
#[derive(Debug, Clone)]
struct PageCall {
    offset: u64,
    limit: u64,
    cursor: Cursor,
}

/// Scriptable search source: serves `total` synthetic identifiers, rotates
/// the cursor on every successful page, and fails the page calls whose
/// indices appear in `fail_calls`.
#[derive(Clone)]
struct MockSearch {
    total: u64,
    fail_calls: Vec<u64>,
    calls: Arc<Mutex<Vec<PageCall>>>,
    successes: Arc<AtomicU64>,
    call_count: Arc<AtomicU64>,
}

impl MockSearch {
    fn new(total: u64) -> Self {
        Self {
            total,
            fail_calls: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            successes: Arc::new(AtomicU64::new(0)),
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    fn failing_on(mut self, calls: &[u64]) -> Self {
        self.fail_calls = calls.to_vec();
        self
    }

    fn recorded_calls(&self) -> Vec<PageCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchSource for MockSearch {
    async fn count(&self, _query: &QueryConfig) -> crate::Result<SearchInit> {
        Ok(SearchInit {
            total: self.total,
            cursor: Cursor::new("env-0", "1"),
        })
    }

    async fn page(
        &self,
        _query: &QueryConfig,
        cursor: &Cursor,
        offset: u64,
        limit: u64,
    ) -> crate::Result<SearchPage> {
        self.calls.lock().unwrap().push(PageCall {
            offset,
            limit,
            cursor: cursor.clone(),
        });
        let call_idx = self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_calls.contains(&call_idx) {
            return Err(Error::upstream("synthetic page failure"));
        }

        let ids = (offset..offset + limit).map(|i| format!("pmid{i}")).collect();
        let generation = self.successes.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SearchPage {
            ids,
            cursor: Cursor::new(format!("env-{generation}"), "1"),
        })
    }
}

async fn collect_pages(pager: &mut Pager<MockSearch>) -> Vec<IdPage> {
    let mut pages = Vec::new();
    while let Some(page) = pager.next_page().await.unwrap() {
        pages.push(page);
    }
    pages
}

// ============================================================================
// Page arithmetic
// ============================================================================

#[test_case(120, 50, &[50, 50, 20]; "short last page")]
#[test_case(100, 50, &[50, 50]; "exact multiple")]
#[test_case(7, 3, &[3, 3, 1]; "small pages")]
#[test_case(5, 10, &[5]; "single short page")]
#[test_case(0, 50, &[]; "empty result set")]
#[tokio::test]
async fn test_page_sizes_cover_total(total: u64, page_size: u64, expected: &[u64]) {
    let source = MockSearch::new(total);
    let mut pager = Pager::new(source, query(), page_size);

    assert_eq!(pager.initialize().await.unwrap(), total);
    assert_eq!(pager.pages_total(), expected.len() as u64);

    let pages = collect_pages(&mut pager).await;
    let sizes: Vec<u64> = pages.iter().map(|p| p.ids.len() as u64).collect();
    assert_eq!(sizes, expected);
    assert_eq!(sizes.iter().sum::<u64>(), total);

    // Exhausted: further calls keep returning None
    assert!(pager.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_page_identifiers_are_ordered_and_disjoint() {
    let source = MockSearch::new(7);
    let mut pager = Pager::new(source, query(), 3);
    pager.initialize().await.unwrap();

    let pages = collect_pages(&mut pager).await;
    let all: Vec<String> = pages.iter().flat_map(|p| p.ids.clone()).collect();
    let expected: Vec<String> = (0..7).map(|i| format!("pmid{i}")).collect();
    assert_eq!(all, expected);
}

#[tokio::test]
async fn test_progress_fraction() {
    let source = MockSearch::new(120);
    let mut pager = Pager::new(source, query(), 50);
    pager.initialize().await.unwrap();

    let pages = collect_pages(&mut pager).await;
    let progress: Vec<f64> = pages.iter().map(|p| p.progress).collect();
    assert_eq!(progress.len(), 3);
    assert!((progress[0] - 1.0 / 3.0).abs() < 1e-9);
    assert!((progress[1] - 2.0 / 3.0).abs() < 1e-9);
    assert!((progress[2] - 1.0).abs() < 1e-9);
}

// ============================================================================
// Cursor propagation
// ============================================================================

#[tokio::test]
async fn test_cursor_lineage() {
    let source = MockSearch::new(120);
    let handle = source.clone();
    let mut pager = Pager::new(source, query(), 50);
    pager.initialize().await.unwrap();
    collect_pages(&mut pager).await;

    // Call k must carry the cursor returned by the response to call k-1
    // (call 0 carries the cursor from initialization).
    let calls = handle.recorded_calls();
    assert_eq!(calls.len(), 3);
    for (k, call) in calls.iter().enumerate() {
        assert_eq!(call.cursor.web_env, format!("env-{k}"));
    }
}

#[tokio::test]
async fn test_failed_page_does_not_advance_cursor() {
    let source = MockSearch::new(120).failing_on(&[1]);
    let handle = source.clone();
    let mut pager = Pager::new(source, query(), 50);
    pager.initialize().await.unwrap();
    collect_pages(&mut pager).await;

    let calls = handle.recorded_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].cursor.web_env, "env-0");
    assert_eq!(calls[1].cursor.web_env, "env-1");
    // Call 1 failed and returned no cursor, so call 2 reuses the last good one
    assert_eq!(calls[2].cursor.web_env, "env-1");
}

#[tokio::test]
async fn test_offsets_advance_by_requested_size() {
    let source = MockSearch::new(120);
    let handle = source.clone();
    let mut pager = Pager::new(source, query(), 50);
    pager.initialize().await.unwrap();
    collect_pages(&mut pager).await;

    let calls = handle.recorded_calls();
    let offsets: Vec<u64> = calls.iter().map(|c| c.offset).collect();
    let limits: Vec<u64> = calls.iter().map(|c| c.limit).collect();
    assert_eq!(offsets, vec![0, 50, 100]);
    assert_eq!(limits, vec![50, 50, 20]);
}

// ============================================================================
// Failure policy
// ============================================================================

#[tokio::test]
async fn test_failed_page_yields_empty_ids_with_warning_status() {
    let source = MockSearch::new(120).failing_on(&[1]);
    let mut pager = Pager::new(source, query(), 50);
    pager.initialize().await.unwrap();

    let pages = collect_pages(&mut pager).await;
    assert_eq!(pages.len(), 3);

    assert_eq!(pages[0].status, PageStatus::Fetched);
    assert!(pages[1].status.is_failed());
    assert!(pages[1].ids.is_empty());
    assert_eq!(pages[2].status, PageStatus::Fetched);
    assert_eq!(pages[2].ids.len(), 20);
}

#[tokio::test]
async fn test_failed_page_distinguishable_from_empty_page() {
    // A zero-record result set produces no pages at all, so the only way to
    // see an empty id list on a Fetched page is a genuinely short response.
    let source = MockSearch::new(50).failing_on(&[0]);
    let mut pager = Pager::new(source, query(), 50);
    pager.initialize().await.unwrap();

    let pages = collect_pages(&mut pager).await;
    assert_eq!(pages.len(), 1);
    match &pages[0].status {
        PageStatus::Failed { reason } => assert!(reason.contains("synthetic page failure")),
        PageStatus::Fetched => panic!("expected failed page"),
    }
}

// ============================================================================
// Fatal conditions
// ============================================================================

struct FailingCount;

#[async_trait]
impl SearchSource for FailingCount {
    async fn count(&self, _query: &QueryConfig) -> crate::Result<SearchInit> {
        Err(Error::upstream("count field absent"))
    }

    async fn page(
        &self,
        _query: &QueryConfig,
        _cursor: &Cursor,
        _offset: u64,
        _limit: u64,
    ) -> crate::Result<SearchPage> {
        unreachable!("page must not be called when initialize fails")
    }
}

#[tokio::test]
async fn test_initialize_failure_is_fatal() {
    let mut pager = Pager::new(FailingCount, query(), 50);
    let err = pager.initialize().await.unwrap_err();
    assert!(matches!(err, Error::Upstream { .. }));
}

struct EmptyCursorCount;

#[async_trait]
impl SearchSource for EmptyCursorCount {
    async fn count(&self, _query: &QueryConfig) -> crate::Result<SearchInit> {
        Ok(SearchInit {
            total: 10,
            cursor: Cursor::new("", ""),
        })
    }

    async fn page(
        &self,
        _query: &QueryConfig,
        _cursor: &Cursor,
        _offset: u64,
        _limit: u64,
    ) -> crate::Result<SearchPage> {
        unreachable!()
    }
}

#[tokio::test]
async fn test_unusable_initial_cursor_is_fatal() {
    let mut pager = Pager::new(EmptyCursorCount, query(), 50);
    let err = pager.initialize().await.unwrap_err();
    assert!(matches!(err, Error::CursorProtocol { .. }));
}

struct CursorDropper;

#[async_trait]
impl SearchSource for CursorDropper {
    async fn count(&self, _query: &QueryConfig) -> crate::Result<SearchInit> {
        Ok(SearchInit {
            total: 100,
            cursor: Cursor::new("env-0", "1"),
        })
    }

    async fn page(
        &self,
        _query: &QueryConfig,
        _cursor: &Cursor,
        _offset: u64,
        _limit: u64,
    ) -> crate::Result<SearchPage> {
        Ok(SearchPage {
            ids: vec!["1".to_string()],
            cursor: Cursor::new("", ""),
        })
    }
}

#[tokio::test]
async fn test_dropped_cursor_mid_run_is_fatal() {
    let mut pager = Pager::new(CursorDropper, query(), 50);
    pager.initialize().await.unwrap();
    let err = pager.next_page().await.unwrap_err();
    assert!(matches!(err, Error::CursorProtocol { .. }));
}

#[tokio::test]
async fn test_next_page_before_initialize_errors() {
    let mut pager = Pager::new(MockSearch::new(10), query(), 5);
    assert!(pager.next_page().await.is_err());
}

#[tokio::test]
async fn test_oversized_response_is_clipped() {
    struct Oversized;

    #[async_trait]
    impl SearchSource for Oversized {
        async fn count(&self, _query: &QueryConfig) -> crate::Result<SearchInit> {
            Ok(SearchInit {
                total: 3,
                cursor: Cursor::new("env", "1"),
            })
        }

        async fn page(
            &self,
            _query: &QueryConfig,
            _cursor: &Cursor,
            _offset: u64,
            _limit: u64,
        ) -> crate::Result<SearchPage> {
            Ok(SearchPage {
                ids: (0..10).map(|i| i.to_string()).collect(),
                cursor: Cursor::new("env", "2"),
            })
        }
    }

    let mut pager = Pager::new(Oversized, query(), 5);
    pager.initialize().await.unwrap();
    let page = pager.next_page().await.unwrap().unwrap();
    assert_eq!(page.ids.len(), 3);
}
