//! Tests for the HTTP client module

use super::*;
use crate::config::HttpConfig;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_http_client_config_from_harvest_config() {
    let harvest = HttpConfig {
        timeout_secs: 10,
        max_retries: 5,
        initial_backoff_ms: 100,
        max_backoff_secs: 20,
        backoff: BackoffType::Linear,
        requests_per_second: 2,
        burst_size: 4,
    };

    let config = HttpClientConfig::from(&harvest);
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(100));
    assert_eq!(config.max_backoff, Duration::from_secs(20));
    let rate_limit = config.rate_limit.unwrap();
    assert_eq!(rate_limit.requests_per_second, 2);
    assert_eq!(rate_limit.burst_size, 4);
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("retstart", "0")
        .query("retmax", "50")
        .query_opt("api_key", Some(&"abc".to_string()))
        .query_opt("email", None)
        .timeout(Duration::from_secs(10))
        .retries(2);

    assert!(config
        .query
        .contains(&("retstart".to_string(), "0".to_string())));
    assert!(config
        .query
        .contains(&("api_key".to_string(), "abc".to_string())));
    assert!(!config.query.iter().any(|(k, _)| k == "email"));
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.max_retries, Some(2));
}

#[test]
fn test_calculate_backoff() {
    let config = HttpClientConfig {
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_secs(1),
        backoff_type: BackoffType::Exponential,
        rate_limit: None,
        ..Default::default()
    };
    let client = HttpClient::with_config(config);

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    // Clamped at max_backoff
    assert_eq!(client.calculate_backoff(10), Duration::from_secs(1));
}

#[tokio::test]
async fn test_http_client_get_with_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "esearchresult": {"count": "3"}
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let config = RequestConfig::new().query("db", "pubmed");
    let data: serde_json::Value = client
        .get_json(&format!("{}/esearch.fcgi", mock_server.uri()), config)
        .await
        .unwrap();

    assert_eq!(data["esearchresult"]["count"], "3");
}

#[tokio::test]
async fn test_http_client_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First request fails, second succeeds
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig {
        max_retries: 3,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(50),
        backoff_type: BackoffType::Constant,
        rate_limit: None,
        ..Default::default()
    };
    let client = HttpClient::with_config(config);

    let response = client
        .get(&format!("{}/flaky", mock_server.uri()))
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_http_client_client_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig {
        max_retries: 3,
        rate_limit: None,
        ..Default::default()
    };
    let client = HttpClient::with_config(config);

    let err = client
        .get(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap_err();

    match err {
        crate::error::Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "nope");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_client_get_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<PubmedArticleSet></PubmedArticleSet>"),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let text = client
        .get_text(
            &format!("{}/efetch.fcgi", mock_server.uri()),
            RequestConfig::new(),
        )
        .await
        .unwrap();

    assert!(text.contains("PubmedArticleSet"));
}
