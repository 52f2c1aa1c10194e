//! Pagination types
//!
//! Request parameters for one metric run, the pages it produces, and the
//! `paging` block parsed out of each page.

use crate::auth::Credential;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// Granularity requested for every metric
pub const PERIOD_DAY: &str = "day";

/// Query parameter carrying the continuation cursor
pub const PAGINATION_TOKEN_PARAM: &str = "pagination_token";

/// Query parameters for one metric's pagination run
///
/// Every field is fixed for the lifetime of the run except the
/// continuation cursor, which only the fetcher sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// Access token sent as a query parameter alongside the header
    pub access_token: Credential,
    /// Aggregation period
    pub period: String,
    /// Metric name
    pub metric: String,
    /// Page-size hint
    pub max_results: u32,
    /// Inclusive start of the window
    pub since: Option<DateTime<Utc>>,
    /// Inclusive end of the window
    pub until: Option<DateTime<Utc>>,
    pagination_token: Option<String>,
}

impl RequestParams {
    /// Create cursor-less parameters for `metric`
    pub fn new(metric: impl Into<String>, access_token: Credential, max_results: u32) -> Self {
        Self {
            access_token,
            period: PERIOD_DAY.to_string(),
            metric: metric.into(),
            max_results,
            since: None,
            until: None,
            pagination_token: None,
        }
    }

    /// Set the start of the window
    #[must_use]
    pub fn since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self
    }

    /// Set the end of the window
    #[must_use]
    pub fn until(mut self, until: Option<DateTime<Utc>>) -> Self {
        self.until = until;
        self
    }

    /// Current continuation cursor
    pub fn pagination_token(&self) -> Option<&str> {
        self.pagination_token.as_deref()
    }

    pub(crate) fn set_pagination_token(&mut self, cursor: String) {
        self.pagination_token = Some(cursor);
    }

    /// Render as query pairs
    ///
    /// Absent `since`, `until` and cursor are left out so the API applies
    /// its own defaults.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("access_token", self.access_token.expose().to_string()),
            ("period", self.period.clone()),
            ("metric", self.metric.clone()),
            ("max_results", self.max_results.to_string()),
        ];
        if let Some(since) = self.since {
            query.push(("since", format_timestamp(since)));
        }
        if let Some(until) = self.until {
            query.push(("until", format_timestamp(until)));
        }
        if let Some(cursor) = &self.pagination_token {
            query.push((PAGINATION_TOKEN_PARAM, cursor.clone()));
        }
        query
    }
}

/// Format a timestamp the way the insights API expects
/// (`2022-11-08T00:00:00.000Z`)
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The `paging` block of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Continuation cursor; `None` when this is the last page
    pub next: Option<String>,
    /// Cursor of the previous page, when the server sends one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl PaginationMeta {
    /// Extract the pagination block from a response body
    ///
    /// A missing or non-object `paging`, or a `next` that is neither a
    /// string nor null, is an error. An empty `next` counts as absent.
    pub fn from_body(body: &Value) -> Result<Self, String> {
        let Value::Object(root) = body else {
            return Err("response body is not a JSON object".to_string());
        };
        let paging = match root.get("paging") {
            Some(Value::Object(paging)) => paging,
            Some(other) => {
                return Err(format!(
                    "`paging` must be an object, got {}",
                    json_type(other)
                ))
            }
            None => return Err("response has no `paging` object".to_string()),
        };

        let next = match paging.get("next") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(format!(
                    "`paging.next` must be a string, got {}",
                    json_type(other)
                ))
            }
        };
        let previous = paging
            .get("previous")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self { next, previous })
    }

    /// True when the server signalled more pages
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One raw response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Metric the page belongs to
    pub metric: String,
    /// Zero-based index within the metric's run
    pub index: u32,
    /// Parsed pagination block
    pub meta: PaginationMeta,
    /// Unmodified response body
    pub body: Value,
}

impl Page {
    /// Continuation cursor returned with this page
    pub fn next_cursor(&self) -> Option<&str> {
        self.meta.next.as_deref()
    }

    /// The result payload (`data`), if present
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }
}
