//! Engine types
//!
//! The fetch plan handed to [`run`](super::run) and the per-run statistics
//! the CLI reports.

use crate::pagination::{Page, PageFetcher, RequestParams};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::num::NonZeroU32;

/// Default page-size hint
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default page limit per metric
pub const DEFAULT_MAX_PAGES: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// What to fetch: metrics in order, the window, and page bounds
///
/// Passed by value into a run; `since` and `until` are used exactly as
/// given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchPlan {
    /// Metric names, fetched in this order
    pub metrics: Vec<String>,
    /// Inclusive start of the window
    pub since: Option<DateTime<Utc>>,
    /// Inclusive end of the window
    pub until: Option<DateTime<Utc>>,
    /// Page-size hint sent as `max_results`
    pub page_size: u32,
    /// Page limit for each metric
    pub max_pages_per_metric: NonZeroU32,
}

impl FetchPlan {
    /// Create a plan with default page bounds and no window
    pub fn new<I, S>(metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            metrics: metrics.into_iter().map(Into::into).collect(),
            since: None,
            until: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages_per_metric: DEFAULT_MAX_PAGES,
        }
    }

    /// Set the window
    #[must_use]
    pub fn with_window(mut self, since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self.until = until;
        self
    }

    /// Set the page-size hint
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the page limit per metric
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: NonZeroU32) -> Self {
        self.max_pages_per_metric = max_pages;
        self
    }

    /// Fresh, cursor-less parameters for one metric
    ///
    /// The access token is the fetcher's own credential, the same one its
    /// bearer header was built from.
    pub fn params_for(&self, metric: &str, fetcher: &PageFetcher) -> RequestParams {
        fetcher
            .params(metric, self.page_size)
            .since(self.since)
            .until(self.until)
    }
}

/// Pages seen per metric during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// `(metric, pages)` in the order metrics were first seen
    pub metrics: Vec<(String, usize)>,
    /// Total pages
    pub pages: usize,
}

impl RunStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a page
    pub fn record(&mut self, page: &Page) {
        self.pages += 1;
        match self.metrics.last_mut() {
            Some((metric, count)) if *metric == page.metric => *count += 1,
            _ => self.metrics.push((page.metric.clone(), 1)),
        }
    }

    /// Pages counted for `metric`
    pub fn pages_for(&self, metric: &str) -> usize {
        self.metrics
            .iter()
            .filter(|(m, _)| m == metric)
            .map(|(_, n)| n)
            .sum()
    }
}
