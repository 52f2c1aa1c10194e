//! Page fetch events
//!
//! The fetcher reports every page it receives through a [`PageObserver`]
//! instead of printing. The caller decides whether to log, trace, count,
//! or ignore them.

use tracing::{debug, info};
use url::Url;

/// Emitted once per page, before the page is handed to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEvent<'a> {
    /// Endpoint the page came from
    pub endpoint: &'a Url,
    /// Metric being paginated, if the request named one
    pub metric: Option<&'a str>,
    /// Zero-based index of the page within its run
    pub page_index: u32,
    /// Cursor that was sent with the request (absent on the first page)
    pub request_cursor: Option<&'a str>,
    /// Cursor returned by the server (absent when no more pages exist)
    pub next_cursor: Option<&'a str>,
    /// Pages still allowed after this one
    pub remaining: u32,
}

impl PageEvent<'_> {
    /// True when the fetcher will request another page after this one
    pub fn will_continue(&self) -> bool {
        self.next_cursor.is_some() && self.remaining > 0
    }
}

/// Receives a [`PageEvent`] for every fetched page
pub trait PageObserver: Send + Sync {
    /// Called after a page is parsed and before it is yielded
    fn on_page(&self, event: &PageEvent<'_>);
}

impl<F> PageObserver for F
where
    F: Fn(&PageEvent<'_>) + Send + Sync,
{
    fn on_page(&self, event: &PageEvent<'_>) {
        self(event);
    }
}

/// Logs page events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PageObserver for TracingObserver {
    fn on_page(&self, event: &PageEvent<'_>) {
        debug!(
            endpoint = %event.endpoint,
            metric = event.metric.unwrap_or("-"),
            page = event.page_index,
            has_next = event.next_cursor.is_some(),
            remaining = event.remaining,
            "Fetched page"
        );
        if event.next_cursor.is_some() && !event.will_continue() {
            info!(
                metric = event.metric.unwrap_or("-"),
                pages = event.page_index + 1,
                "Page limit reached with more pages available"
            );
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PageObserver for NoopObserver {
    fn on_page(&self, _event: &PageEvent<'_>) {}
}
