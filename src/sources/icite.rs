//! iCite metrics client
//!
//! Implements [`MetricsSource`] over the iCite bulk endpoint: one GET per
//! identifier batch, response is `{ "data": [ ...records... ] }` keyed by
//! pmid. The API serves pmid as a number; identifiers everywhere else in
//! this crate are strings, so records are keyed by the stringified value.

use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::joiner::{MetricsRecord, MetricsSource};
use crate::pager::Pmid;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Client for the iCite bulk metrics endpoint
#[derive(Clone)]
pub struct IciteClient {
    http: Arc<HttpClient>,
    url: String,
}

impl IciteClient {
    /// Create a client against the configured endpoint
    pub fn new(http: Arc<HttpClient>, endpoints: &EndpointConfig) -> Self {
        Self {
            http,
            url: endpoints.icite_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IciteEnvelope {
    data: Option<Vec<IciteRecord>>,
}

#[derive(Debug, Deserialize)]
struct IciteRecord {
    pmid: serde_json::Value,
    citation_count: Option<u64>,
    title: Option<String>,
    journal: Option<String>,
    relative_citation_ratio: Option<f64>,
    citations_per_year: Option<f64>,
    expected_citations_per_year: Option<f64>,
    field_citation_rate: Option<f64>,
    is_research_article: Option<bool>,
    year: Option<i32>,
}

impl IciteRecord {
    /// Stringified pmid, whether the API sent a number or a string
    fn key(&self) -> Option<Pmid> {
        match &self.pmid {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn into_metrics(self) -> MetricsRecord {
        MetricsRecord {
            citation_count: self.citation_count,
            title: self.title,
            journal: self.journal,
            relative_citation_ratio: self.relative_citation_ratio,
            citations_per_year: self.citations_per_year,
            expected_citations_per_year: self.expected_citations_per_year,
            field_citation_rate: self.field_citation_rate,
            is_research_article: self.is_research_article,
            year: self.year,
        }
    }
}

#[async_trait]
impl MetricsSource for IciteClient {
    async fn fetch_metrics(&self, ids: &[Pmid]) -> Result<HashMap<Pmid, MetricsRecord>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let request = RequestConfig::new().query("pmids", ids.join(","));
        let envelope: IciteEnvelope = self.http.get_json(&self.url, request).await?;

        let data = envelope
            .data
            .ok_or_else(|| Error::upstream("icite response missing data"))?;

        let mut records = HashMap::new();
        for record in data {
            if let Some(key) = record.key() {
                records.insert(key, record.into_metrics());
            }
        }

        debug!(requested = ids.len(), returned = records.len(), "icite batch fetched");
        Ok(records)
    }
}
