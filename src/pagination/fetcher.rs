//! Cursor-following page fetcher

use super::types::{Page, PaginationMeta, RequestParams};
use crate::auth::{build_headers, AuthHeaders, Credential};
use crate::error::{Error, Result};
use crate::events::{PageEvent, PageObserver, TracingObserver};
use crate::http::Transport;
use futures::Stream;
use serde_json::Value;
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Lazy, finite sequence of pages
///
/// Nothing is requested until the stream is polled. After the last page
/// or the first error it only returns `None`; fetching again needs a new
/// stream.
pub type PageStream<'a> = Pin<Box<dyn Stream<Item = Result<Page>> + Send + 'a>>;

/// Fetches pages from one endpoint with fixed credentials
///
/// The bearer header and the `access_token` parameter built by
/// [`params`](Self::params) come from the same [`Credential`].
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    endpoint: Url,
    secret: Credential,
    headers: AuthHeaders,
    observer: Arc<dyn PageObserver>,
}

struct RunState {
    params: RequestParams,
    remaining: u32,
    index: u32,
}

impl PageFetcher {
    /// Create a fetcher, building the bearer headers from `secret`
    pub fn for_credential(transport: Arc<dyn Transport>, endpoint: Url, secret: &Credential) -> Self {
        Self {
            transport,
            endpoint,
            headers: build_headers(secret),
            secret: secret.clone(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the page observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PageObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Endpoint every request goes to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &AuthHeaders {
        &self.headers
    }

    /// Cursor-less parameters for `metric`, carrying this fetcher's secret
    pub fn params(&self, metric: &str, max_results: u32) -> RequestParams {
        RequestParams::new(metric, self.secret.clone(), max_results)
    }

    /// Stream up to `max_pages` pages, following `paging.next`
    ///
    /// `params` must not carry a cursor yet; the first request is always
    /// cursor-less and each following one carries the cursor of the page
    /// before it. The stream stops after a page without a cursor, after
    /// `max_pages` pages, or after yielding the first error.
    pub fn fetch_pages(&self, params: RequestParams, max_pages: NonZeroU32) -> PageStream<'_> {
        let state = RunState {
            params,
            remaining: max_pages.get(),
            index: 0,
        };

        Box::pin(futures::stream::try_unfold(Some(state), move |state| {
            self.step(state)
        }))
    }

    /// Fetch one page and decide whether the run continues
    async fn step(&self, state: Option<RunState>) -> Result<Option<(Page, Option<RunState>)>> {
        let Some(mut state) = state else {
            return Ok(None);
        };

        let page = self.fetch_page(&state.params, state.index).await?;
        state.remaining -= 1;
        debug!(
            metric = %page.metric,
            page = page.index,
            entries = page.data().and_then(serde_json::Value::as_array).map_or(0, Vec::len),
            "Received page"
        );

        self.observer.on_page(&PageEvent {
            endpoint: &self.endpoint,
            metric: Some(page.metric.as_str()),
            page_index: page.index,
            request_cursor: state.params.pagination_token(),
            next_cursor: page.next_cursor(),
            remaining: state.remaining,
        });

        let next_state = match page.next_cursor() {
            Some(cursor) if state.remaining > 0 => {
                state.params.set_pagination_token(cursor.to_string());
                state.index += 1;
                Some(state)
            }
            _ => None,
        };

        Ok(Some((page, next_state)))
    }

    async fn fetch_page(&self, params: &RequestParams, index: u32) -> Result<Page> {
        debug!(
            endpoint = %self.endpoint,
            metric = %params.metric,
            page = index,
            continuation = params.pagination_token().is_some(),
            "Requesting page"
        );

        let response = self
            .transport
            .get(&self.endpoint, &self.headers, &params.to_query())
            .await?;

        if !response.is_success() {
            warn!(
                endpoint = %self.endpoint,
                metric = %params.metric,
                status = response.status,
                "Page request failed"
            );
            return Err(Error::from_status(
                self.endpoint.as_str(),
                response.status,
                response.body,
            ));
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|e| {
            Error::malformed(self.endpoint.as_str(), format!("body is not valid JSON: {e}"))
        })?;
        let meta = PaginationMeta::from_body(&body)
            .map_err(|message| Error::malformed(self.endpoint.as_str(), message))?;

        Ok(Page {
            metric: params.metric.clone(),
            index,
            meta,
            body,
        })
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("endpoint", &self.endpoint.as_str())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
