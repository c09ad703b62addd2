//! Entrez e-utilities client
//!
//! Implements [`SearchSource`] over the esearch endpoint (JSON, with the
//! history server's WebEnv/query_key continuation cursor) and
//! [`DetailSource`] over the efetch endpoint (XML, streamed with quick-xml
//! to extract per-article author counts and titles).

use crate::config::{ContactConfig, EndpointConfig, QueryConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::joiner::{DetailRecord, DetailSource};
use crate::pager::{Cursor, Pmid, SearchInit, SearchPage, SearchSource};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Client for the esearch and efetch endpoints
#[derive(Clone)]
pub struct EntrezClient {
    http: Arc<HttpClient>,
    esearch_url: String,
    efetch_url: String,
    contact: ContactConfig,
    api_key: Option<String>,
}

impl EntrezClient {
    /// Create a client against the configured endpoints
    pub fn new(
        http: Arc<HttpClient>,
        endpoints: &EndpointConfig,
        contact: ContactConfig,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            esearch_url: endpoints.esearch_url.clone(),
            efetch_url: endpoints.efetch_url.clone(),
            contact,
            api_key,
        }
    }

    /// Shared parameters for every e-utilities request
    fn base_request(&self) -> RequestConfig {
        RequestConfig::new()
            .query("db", "pubmed")
            .query("tool", &self.contact.tool)
            .query_opt("email", self.contact.email.as_ref())
            .query_opt("api_key", self.api_key.as_ref())
    }

    fn with_query(config: RequestConfig, query: &QueryConfig) -> RequestConfig {
        config
            .query("term", &query.term)
            .query("mindate", &query.mindate)
            .query("maxdate", &query.maxdate)
            .query("datetype", &query.datetype)
    }
}

// ============================================================================
// esearch (SearchSource)
// ============================================================================

#[derive(Debug, Deserialize)]
struct EsearchEnvelope {
    esearchresult: Option<EsearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct EsearchResult {
    count: Option<String>,
    #[serde(rename = "webenv")]
    web_env: Option<String>,
    #[serde(rename = "querykey")]
    query_key: Option<String>,
    idlist: Option<Vec<String>>,
}

#[async_trait]
impl SearchSource for EntrezClient {
    async fn count(&self, query: &QueryConfig) -> Result<SearchInit> {
        let request = Self::with_query(self.base_request(), query)
            .query("retmode", "json")
            .query("rettype", "count")
            .query("usehistory", "y");

        let envelope: EsearchEnvelope = self.http.get_json(&self.esearch_url, request).await?;
        let result = envelope
            .esearchresult
            .ok_or_else(|| Error::upstream("esearch response missing esearchresult"))?;

        let count: i64 = result
            .count
            .as_deref()
            .ok_or_else(|| Error::upstream("esearch response missing count"))?
            .parse()
            .map_err(|_| Error::upstream("esearch count is not an integer"))?;
        if count < 0 {
            return Err(Error::exhausted_input(format!(
                "esearch returned a negative count: {count}"
            )));
        }

        let cursor = Cursor::new(
            result.web_env.unwrap_or_default(),
            result.query_key.unwrap_or_default(),
        );
        debug!(count, "esearch count established");
        Ok(SearchInit {
            total: count as u64,
            cursor,
        })
    }

    async fn page(
        &self,
        query: &QueryConfig,
        cursor: &Cursor,
        offset: u64,
        limit: u64,
    ) -> Result<SearchPage> {
        let request = Self::with_query(self.base_request(), query)
            .query("retmode", "json")
            .query("usehistory", "y")
            .query("retstart", offset.to_string())
            .query("retmax", limit.to_string())
            .query("WebEnv", &cursor.web_env)
            .query("query_key", &cursor.query_key);

        let envelope: EsearchEnvelope = self.http.get_json(&self.esearch_url, request).await?;
        let result = envelope
            .esearchresult
            .ok_or_else(|| Error::upstream("esearch response missing esearchresult"))?;

        let ids = result
            .idlist
            .ok_or_else(|| Error::upstream("esearch response missing idlist"))?;

        // The history server usually echoes the cursor back; if a response
        // omits it the previous one is still the latest the source supplied.
        let updated = Cursor::new(
            result.web_env.unwrap_or_else(|| cursor.web_env.clone()),
            result.query_key.unwrap_or_else(|| cursor.query_key.clone()),
        );

        debug!(offset, limit, returned = ids.len(), "esearch page fetched");
        Ok(SearchPage {
            ids,
            cursor: updated,
        })
    }
}

// ============================================================================
// efetch (DetailSource)
// ============================================================================

#[async_trait]
impl DetailSource for EntrezClient {
    async fn fetch_details(&self, ids: &[Pmid]) -> Result<HashMap<Pmid, DetailRecord>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let request = self
            .base_request()
            .query("id", ids.join(","))
            .query("retmode", "xml");

        let xml = self.http.get_text(&self.efetch_url, request).await?;
        parse_efetch_xml(&xml)
    }
}

/// Extract per-article author counts and titles from efetch XML.
///
/// The investigator list takes precedence over the author list when both are
/// present. Articles without either list get no author count.
fn parse_efetch_xml(xml: &str) -> Result<HashMap<Pmid, DetailRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = HashMap::new();

    // Per-article state
    let mut pmid: Option<String> = None;
    let mut title = String::new();
    let mut author_count: u32 = 0;
    let mut investigator_count: u32 = 0;

    // Parser position
    let mut in_medline_citation = false;
    let mut in_pmid = false;
    let mut in_title = false;
    let mut in_author_list = false;
    let mut in_investigator_list = false;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(Error::xml(format!(
                    "efetch XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    pmid = None;
                    title.clear();
                    author_count = 0;
                    investigator_count = 0;
                }
                b"MedlineCitation" => in_medline_citation = true,
                // Only the citation's own PMID; reference lists carry their
                // own PMID elements further down.
                b"PMID" if in_medline_citation && pmid.is_none() => in_pmid = true,
                b"ArticleTitle" => in_title = true,
                b"AuthorList" => in_author_list = true,
                b"InvestigatorList" => in_investigator_list = true,
                b"Author" if in_author_list => author_count += 1,
                b"Investigator" if in_investigator_list => investigator_count += 1,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"Author" if in_author_list => author_count += 1,
                b"Investigator" if in_investigator_list => investigator_count += 1,
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if in_pmid || in_title {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::xml(format!("efetch XML text: {e}")))?;
                    if in_pmid {
                        pmid = Some(text.into_owned());
                    } else {
                        title.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"MedlineCitation" => in_medline_citation = false,
                b"PMID" => in_pmid = false,
                b"ArticleTitle" => in_title = false,
                b"AuthorList" => in_author_list = false,
                b"InvestigatorList" => in_investigator_list = false,
                b"PubmedArticle" => {
                    if let Some(id) = pmid.take() {
                        let count = if investigator_count > 0 {
                            Some(investigator_count)
                        } else if author_count > 0 {
                            Some(author_count)
                        } else {
                            None
                        };
                        records.insert(
                            id,
                            DetailRecord {
                                author_count: count,
                                title: if title.is_empty() {
                                    None
                                } else {
                                    Some(title.clone())
                                },
                            },
                        );
                    }
                }
                _ => {}
            },
            Ok(_) => {}
        }
    }

    Ok(records)
}
