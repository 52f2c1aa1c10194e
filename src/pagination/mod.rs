//! Pagination module
//!
//! Cursor pagination over the insights endpoint.
//!
//! # Overview
//!
//! [`PageFetcher::fetch_pages`] issues one request per poll, reads the
//! `paging.next` cursor out of each response and sends it back as
//! `pagination_token` on the following request. A run ends when a page
//! comes back without a cursor or the page limit is reached. A response
//! without a usable `paging` block is an error, never an implicit end.

mod fetcher;
mod types;

pub use fetcher::{PageFetcher, PageStream};
pub use types::{
    format_timestamp, Page, PaginationMeta, RequestParams, PAGINATION_TOKEN_PARAM, PERIOD_DAY,
};
