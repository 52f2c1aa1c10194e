//! Execution engine module
//!
//! Runs the paginated fetcher once per metric and chains the results.
//!
//! # Overview
//!
//! [`run`] walks the plan's metrics in order. Each metric gets fresh
//! request parameters and its own cursor-less pagination run; the page
//! streams are concatenated into one. The first error ends the whole
//! sequence, so later metrics are never requested after a failure. Callers
//! that want per-metric isolation can call [`run_metric`] themselves.

mod types;

pub use types::{FetchPlan, RunStats, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};

use crate::error::Result;
use crate::pagination::{Page, PageFetcher, PageStream};
use futures::StreamExt;
use tracing::{info, warn};

struct MetricRun<'a> {
    metric: &'a str,
    pages: PageStream<'a>,
    fetched: usize,
}

struct RunState<'a> {
    pending: std::slice::Iter<'a, String>,
    current: Option<MetricRun<'a>>,
}

/// Stream every page of every metric in `plan`, metric by metric
///
/// The fetcher's credential is sent both as the bearer header and as the
/// `access_token` query parameter.
pub fn run<'a>(fetcher: &'a PageFetcher, plan: &'a FetchPlan) -> PageStream<'a> {
    let state = RunState {
        pending: plan.metrics.iter(),
        current: None,
    };

    Box::pin(futures::stream::try_unfold(state, move |state| {
        next_page(fetcher, plan, state)
    }))
}

/// Stream the pages of a single metric
pub fn run_metric<'a>(fetcher: &'a PageFetcher, plan: &FetchPlan, metric: &str) -> PageStream<'a> {
    fetcher.fetch_pages(plan.params_for(metric, fetcher), plan.max_pages_per_metric)
}

async fn next_page<'a>(
    fetcher: &'a PageFetcher,
    plan: &'a FetchPlan,
    mut state: RunState<'a>,
) -> Result<Option<(Page, RunState<'a>)>> {
    loop {
        if let Some(current) = state.current.as_mut() {
            match current.pages.next().await {
                Some(Ok(page)) => {
                    current.fetched += 1;
                    return Ok(Some((page, state)));
                }
                Some(Err(e)) => {
                    warn!(metric = current.metric, pages = current.fetched, error = %e, "Metric fetch failed");
                    return Err(e);
                }
                None => {
                    info!(metric = current.metric, pages = current.fetched, "Finished metric");
                    state.current = None;
                }
            }
        }

        let Some(metric) = state.pending.next() else {
            return Ok(None);
        };
        info!(metric = %metric, "Starting metric");
        state.current = Some(MetricRun {
            metric,
            pages: run_metric(fetcher, plan, metric),
            fetched: 0,
        });
    }
}

#[cfg(test)]
mod tests;
