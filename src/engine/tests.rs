//! Tests for engine module

use super::*;
use crate::auth::Credential;
use crate::error::Error;
use crate::http::RawResponse;
use crate::pagination::tests::{drain, ok_page, pages, test_endpoint, ScriptedTransport};
use crate::pagination::{PageFetcher, PAGINATION_TOKEN_PARAM};
use chrono::{TimeZone, Utc};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use test_case::test_case;

fn secret() -> Credential {
    Credential::new("secret")
}

fn fetcher(transport: &Arc<ScriptedTransport>) -> PageFetcher {
    PageFetcher::for_credential(transport.clone(), test_endpoint(), &secret())
}

// ============================================================================
// FetchPlan Tests
// ============================================================================

#[test]
fn test_fetch_plan_defaults() {
    let plan = FetchPlan::new(["impressions", "reach"]);
    assert_eq!(plan.metrics, vec!["impressions", "reach"]);
    assert_eq!(plan.page_size, 20);
    assert_eq!(plan.max_pages_per_metric.get(), 5);
    assert!(plan.since.is_none());
    assert!(plan.until.is_none());
}

#[test]
fn test_fetch_plan_params_keep_window() {
    let since = Utc.with_ymd_and_hms(2022, 11, 8, 0, 0, 0).unwrap();
    let until = Utc.with_ymd_and_hms(2022, 11, 9, 0, 0, 0).unwrap();
    let plan = FetchPlan::new(["reach"])
        .with_window(Some(since), Some(until))
        .with_page_size(50);

    let transport = Arc::new(ScriptedTransport::endless());
    let params = plan.params_for("reach", &fetcher(&transport));
    assert_eq!(params.metric, "reach");
    assert_eq!(params.period, "day");
    assert_eq!(params.max_results, 50);
    assert_eq!(params.since, Some(since));
    assert_eq!(params.until, Some(until));
    assert_eq!(params.access_token.expose(), "secret");
    assert_eq!(params.pagination_token(), None);
}

// ============================================================================
// RunStats Tests
// ============================================================================

#[test]
fn test_run_stats_record() {
    let mut stats = RunStats::new();
    let page = |metric: &str| crate::pagination::Page {
        metric: metric.to_string(),
        index: 0,
        meta: crate::pagination::PaginationMeta::default(),
        body: serde_json::json!({}),
    };

    stats.record(&page("impressions"));
    stats.record(&page("impressions"));
    stats.record(&page("reach"));

    assert_eq!(stats.pages, 3);
    assert_eq!(stats.pages_for("impressions"), 2);
    assert_eq!(stats.pages_for("reach"), 1);
    assert_eq!(stats.pages_for("profile_views"), 0);
    assert_eq!(
        stats.metrics,
        vec![("impressions".to_string(), 2), ("reach".to_string(), 1)]
    );
}

// ============================================================================
// Metric iteration
// ============================================================================

#[tokio::test]
async fn test_two_metrics_with_endless_cursors() {
    let transport = Arc::new(ScriptedTransport::endless());
    let fetcher = fetcher(&transport);
    let plan = FetchPlan::new(["impressions", "reach"]).with_max_pages(pages(2));

    let (got, err) = drain(run(&fetcher, &plan)).await;

    assert!(err.is_none());
    let order: Vec<(&str, u32)> = got.iter().map(|p| (p.metric.as_str(), p.index)).collect();
    assert_eq!(
        order,
        vec![("impressions", 0), ("impressions", 1), ("reach", 0), ("reach", 1)]
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[2].query.get("metric"), Some(&"reach".to_string()));
    assert_eq!(requests[2].query.get(PAGINATION_TOKEN_PARAM), None);
    assert_eq!(
        requests[3].query.get(PAGINATION_TOKEN_PARAM),
        Some(&"reach-1".to_string())
    );
}

#[test_case(&["impressions"], 3 ; "single metric")]
#[test_case(&["impressions", "reach", "profile_views"], 2 ; "three metrics")]
#[test_case(&["a", "b", "c", "d"], 1 ; "single page each")]
#[tokio::test]
async fn test_page_count_is_sum_of_runs(metrics: &[&str], max: u32) {
    let transport = Arc::new(ScriptedTransport::endless());
    let fetcher = fetcher(&transport);
    let plan = FetchPlan::new(metrics.iter().copied()).with_max_pages(pages(max));

    let (got, err) = drain(run(&fetcher, &plan)).await;

    assert!(err.is_none());
    assert_eq!(got.len(), metrics.len() * max as usize);

    // No interleaving: metrics appear in contiguous blocks, in plan order.
    let mut seen: Vec<&str> = got.iter().map(|p| p.metric.as_str()).collect();
    seen.dedup();
    assert_eq!(seen, metrics.to_vec());
}

#[tokio::test]
async fn test_failure_stops_before_next_metric() {
    let transport = Arc::new(ScriptedTransport::new(|query| {
        match query.get("metric").map(String::as_str) {
            Some("reach") => RawResponse::new(500, "boom"),
            Some(metric) => ok_page(metric, None),
            None => RawResponse::new(400, "no metric"),
        }
    }));
    let fetcher = fetcher(&transport);
    let plan = FetchPlan::new(["impressions", "reach", "profile_views"]);

    let (got, err) = drain(run(&fetcher, &plan)).await;

    assert_eq!(got.len(), 1);
    assert_eq!(got[0].metric, "impressions");
    assert!(matches!(err, Some(Error::RequestFailed { status: 500, .. })));

    let metrics: Vec<String> = transport
        .requests()
        .into_iter()
        .filter_map(|r| r.query.get("metric").cloned())
        .collect();
    assert_eq!(metrics, vec!["impressions", "reach"]);
}

#[tokio::test]
async fn test_unauthorized_yields_nothing() {
    let transport = Arc::new(ScriptedTransport::new(|_| RawResponse::new(401, "")));
    let fetcher = fetcher(&transport);
    let plan = FetchPlan::new(["impressions", "reach"]);

    let (got, err) = drain(run(&fetcher, &plan)).await;

    assert!(got.is_empty());
    assert!(err.unwrap().is_auth_rejection());
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_empty_plan_yields_nothing() {
    let transport = Arc::new(ScriptedTransport::endless());
    let fetcher = fetcher(&transport);
    let plan = FetchPlan::new(Vec::<String>::new());

    let (got, err) = drain(run(&fetcher, &plan)).await;

    assert!(got.is_empty());
    assert!(err.is_none());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_run_is_lazy() {
    let transport = Arc::new(ScriptedTransport::endless());
    let fetcher = fetcher(&transport);
    let plan = FetchPlan::new(["impressions", "reach"]);

    let mut stream = run(&fetcher, &plan);
    assert_eq!(transport.request_count(), 0);

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.metric, "impressions");
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_access_token_and_header_on_every_request() {
    let transport = Arc::new(ScriptedTransport::endless());
    let fetcher = fetcher(&transport);
    let plan = FetchPlan::new(["impressions", "reach"]).with_max_pages(pages(2));

    drain(run(&fetcher, &plan)).await;

    for request in transport.requests() {
        assert_eq!(request.query.get("access_token"), Some(&"secret".to_string()));
        assert_eq!(
            request.headers.get("Authorization"),
            Some(&"Bearer secret".to_string())
        );
    }
}

#[tokio::test]
async fn test_run_metric_isolated() {
    let transport = Arc::new(ScriptedTransport::sequence(vec![
        ok_page("reach", Some("abc")),
        ok_page("reach", None),
    ]));
    let fetcher = fetcher(&transport);
    let plan = FetchPlan::new(["impressions", "reach"]);

    let (got, err) = drain(run_metric(&fetcher, &plan, "reach")).await;

    assert!(err.is_none());
    assert_eq!(got.len(), 2);
    assert!(got.iter().all(|p| p.metric == "reach"));
}

#[tokio::test]
async fn test_header_and_access_token_share_one_credential() {
    let transport = Arc::new(ScriptedTransport::sequence(vec![
        ok_page("impressions", None),
        ok_page("reach", None),
    ]));
    let fetcher = PageFetcher::for_credential(
        transport.clone(),
        test_endpoint(),
        &Credential::new("only-secret"),
    );
    let plan = FetchPlan::new(["impressions", "reach"]);

    let (got, err) = drain(run(&fetcher, &plan)).await;

    assert!(err.is_none());
    assert_eq!(got.len(), 2);
    for request in transport.requests() {
        assert_eq!(
            request.headers.get("Authorization"),
            Some(&"Bearer only-secret".to_string())
        );
        assert_eq!(
            request.query.get("access_token"),
            Some(&"only-secret".to_string())
        );
    }
}
