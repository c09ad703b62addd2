//! Harvest configuration
//!
//! This module contains the configuration structures for a harvest run,
//! loadable from YAML. Contact identification (tool name + maintainer email)
//! and the optional API key live here explicitly rather than as global
//! constants baked into request parameters.

use crate::error::{Error, Result};
use crate::http::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

// ============================================================================
// Top-Level Harvest Config
// ============================================================================

/// Complete harvest configuration, loadable from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Search query definition
    pub query: QueryConfig,

    /// Identifiers requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Stop after this many records (0 = unlimited)
    #[serde(default)]
    pub max_records: usize,

    /// Contact identification sent to the search/detail API
    #[serde(default)]
    pub contact: ContactConfig,

    /// Optional API key forwarded on search/detail requests
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP client tuning
    #[serde(default)]
    pub http: HttpConfig,

    /// Remote endpoint URLs
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Report output path
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_page_size() -> u64 {
    500
}

fn default_output() -> PathBuf {
    PathBuf::from("publications.tsv")
}

impl HarvestConfig {
    /// Create a config for a single publication year with defaults elsewhere
    pub fn for_year(term: impl Into<String>, year: impl Into<String>) -> Self {
        let year = year.into();
        Self {
            query: QueryConfig {
                term: term.into(),
                mindate: year.clone(),
                maxdate: year,
                datetype: default_datetype(),
            },
            page_size: default_page_size(),
            max_records: 0,
            contact: ContactConfig::default(),
            api_key: None,
            http: HttpConfig::default(),
            endpoints: EndpointConfig::default(),
            output: default_output(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.query.term.trim().is_empty() {
            return Err(Error::config("query.term must not be empty"));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        for (name, value) in [
            ("endpoints.esearch_url", &self.endpoints.esearch_url),
            ("endpoints.efetch_url", &self.endpoints.efetch_url),
            ("endpoints.icite_url", &self.endpoints.icite_url),
        ] {
            Url::parse(value).map_err(|e| Error::config(format!("{name}: {e}")))?;
        }
        Ok(())
    }
}

// ============================================================================
// Query
// ============================================================================

/// Search query definition: term plus a publication-date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Search term
    pub term: String,

    /// Start of the date range (e.g. "2014")
    pub mindate: String,

    /// End of the date range (e.g. "2014")
    pub maxdate: String,

    /// Date field the range applies to
    #[serde(default = "default_datetype")]
    pub datetype: String,
}

fn default_datetype() -> String {
    "pdat".to_string()
}

// ============================================================================
// Contact
// ============================================================================

/// Contact identification for the upstream API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Tool name reported to the API
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Maintainer email reported to the API
    #[serde(default)]
    pub email: Option<String>,
}

fn default_tool() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            email: None,
        }
    }
}

// ============================================================================
// HTTP tuning
// ============================================================================

/// HTTP client tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// Request rate cap toward the remote sources
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Burst size for the rate limiter
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_secs() -> u64 {
    60
}

fn default_requests_per_second() -> u32 {
    3
}

fn default_burst_size() -> u32 {
    3
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            backoff: BackoffType::default(),
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Remote endpoint URLs (overridable, e.g. for tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Search endpoint (count + identifier pages)
    #[serde(default = "default_esearch_url")]
    pub esearch_url: String,

    /// Detail endpoint (per-identifier XML records)
    #[serde(default = "default_efetch_url")]
    pub efetch_url: String,

    /// Metrics endpoint (per-identifier citation metrics)
    #[serde(default = "default_icite_url")]
    pub icite_url: String,
}

fn default_esearch_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi".to_string()
}

fn default_efetch_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi".to_string()
}

fn default_icite_url() -> String {
    "https://icite.od.nih.gov/api/pubs".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            esearch_url: default_esearch_url(),
            efetch_url: default_efetch_url(),
            icite_url: default_icite_url(),
        }
    }
}
