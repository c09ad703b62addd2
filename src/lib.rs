// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pubharvest
//!
//! Bulk retrieval and joining of publication metadata from paginated
//! literature APIs.
//!
//! ## Features
//!
//! - **Cursor-correct pagination**: every page request carries the latest
//!   continuation cursor the search API returned, never a stale one
//! - **Two-source join**: each identifier page is joined against an
//!   independent detail source (efetch XML) and metrics source (iCite JSON),
//!   strictly by key
//! - **Transient tolerance**: a malformed or timed-out page/batch becomes an
//!   empty result with a logged warning, never an aborted run
//! - **Polite by default**: token-bucket rate limiting, bounded timeouts,
//!   retry with backoff toward the rate-limited upstream APIs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pubharvest::config::HarvestConfig;
//! use pubharvest::engine::HarvestEngine;
//!
//! #[tokio::main]
//! async fn main() -> pubharvest::Result<()> {
//!     let config = HarvestConfig::from_yaml_file("harvest.yaml")?;
//!     let stats = HarvestEngine::from_config(config)?.run().await?;
//!     println!("{} records in {} pages", stats.records_written, stats.pages_fetched);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        HarvestEngine                         │
//! │  initialize → page loop → join page → append to TSV report   │
//! └──────────────────────────────────────────────────────────────┘
//!                │                          │
//! ┌──────────────┴──────────┐  ┌────────────┴──────────────────┐
//! │          Pager          │  │            Joiner             │
//! │  count + cursor init    │  │  details ∥ metrics fetch      │
//! │  offset/cursor paging   │  │  key-based ordered merge      │
//! │  short last page        │  │  "unknown" markers            │
//! └─────────────────────────┘  └───────────────────────────────┘
//!                │                          │
//!          SearchSource            DetailSource / MetricsSource
//!          (esearch JSON)          (efetch XML)   (iCite JSON)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Harvest configuration
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// Paginated identifier retrieval
pub mod pager;

/// Two-source batch join
pub mod joiner;

/// Remote source clients and trait seams
pub mod sources;

/// TSV report output
pub mod report;

/// Main harvest engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
