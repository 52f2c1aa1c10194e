//! Tests for the HTTP transport module

use super::*;
use crate::auth::{build_headers, Credential};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{p}", server.uri())).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("instagram-insights/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .rate_limit(RateLimiterConfig::per_hour(200))
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::per_hour(200)));
    assert_eq!(config.user_agent, "test-agent/1.0");

    let client = HttpClient::with_config(config).unwrap();
    assert!(format!("{client:?}").contains("has_rate_limiter: true"));
}

#[test]
fn test_raw_response_success_range() {
    assert!(RawResponse::new(200, "").is_success());
    assert!(RawResponse::new(204, "").is_success());
    assert!(!RawResponse::new(301, "").is_success());
    assert!(!RawResponse::new(401, "").is_success());
    assert!(!RawResponse::new(500, "").is_success());
}

#[tokio::test]
async fn test_get_sends_headers_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v15.0/123/insights"))
        .and(header("Authorization", "Bearer test-token"))
        .and(query_param("metric", "impressions"))
        .and(query_param("period", "day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [],
            "paging": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let headers = build_headers(&Credential::new("test-token"));
    let query = vec![
        ("metric", "impressions".to_string()),
        ("period", "day".to_string()),
    ];

    let response = client
        .get(&endpoint(&mock_server, "/v15.0/123/insights"), &headers, &query)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert!(body["paging"].is_object());
}

#[tokio::test]
async fn test_get_returns_error_status_as_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/insights"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let headers = build_headers(&Credential::new("bad"));

    let response = client
        .get(&endpoint(&mock_server, "/insights"), &headers, &[])
        .await
        .unwrap();

    assert_eq!(response.status, 401);
    assert_eq!(response.body, "invalid token");
}

#[tokio::test]
async fn test_get_does_not_retry_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/insights"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let headers = build_headers(&Credential::new("t"));

    let response = client
        .get(&endpoint(&mock_server, "/insights"), &headers, &[])
        .await
        .unwrap();

    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn test_get_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .timeout(Duration::from_millis(50))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    let headers = build_headers(&Credential::new("t"));

    let err = client
        .get(&endpoint(&mock_server, "/slow"), &headers, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, crate::error::Error::Timeout { timeout_ms: 50 }));
}

#[tokio::test]
async fn test_connect_error_does_not_expose_access_token() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(5))
            .build(),
    )
    .unwrap();
    let secret = "SUPERSECRET123";
    let headers = build_headers(&Credential::new(secret));
    let query = vec![
        ("access_token", secret.to_string()),
        ("metric", "impressions".to_string()),
    ];
    let unreachable = Url::parse("http://127.0.0.1:1/v15.0/1/insights").unwrap();

    let err = client.get(&unreachable, &headers, &query).await.unwrap_err();

    assert!(matches!(err, crate::error::Error::Http(_)));
    assert!(!err.to_string().contains(secret), "leaked in {err}");
    assert!(!format!("{err:?}").contains(secret), "leaked in {err:?}");
}
