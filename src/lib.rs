#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # instagram-insights
//!
//! Fetches Instagram Graph API insights metrics, one cursor-paginated run
//! per metric, and hands back the raw response pages as a lazy stream.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use instagram_insights::{engine, Credential, FetchPlan, HttpClient, PageFetcher};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> instagram_insights::Result<()> {
//!     let secret = Credential::from_env("INSTAGRAM_API_SECRET_KEY")?;
//!     let endpoint = "https://graph.facebook.com/v15.0/1234/insights".parse()?;
//!     let fetcher = PageFetcher::for_credential(Arc::new(HttpClient::new()?), endpoint, &secret);
//!
//!     let plan = FetchPlan::new(["impressions", "reach"]);
//!     let mut pages = engine::run(&fetcher, &plan);
//!     while let Some(page) = pages.next().await {
//!         let page = page?;
//!         println!("{} #{}: {}", page.metric, page.index, page.body);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  engine::run(fetcher, plan) → Stream<Page>               │
//! │  one run per metric, concatenated, stops on first error  │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────────────┬──────────────┐
//! │    Auth      │        Pagination          │     HTTP     │
//! ├──────────────┼────────────────────────────┼──────────────┤
//! │ Bearer header│ paging.next →              │ Transport    │
//! │ Credential   │   pagination_token         │ reqwest      │
//! │              │ max pages, PageEvent hook  │ rate limit   │
//! └──────────────┴────────────────────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Bearer credential handling
pub mod auth;

/// HTTP transport with rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Per-page event hook
pub mod events;

/// Per-metric iteration
pub mod engine;

/// Configuration loading
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{build_headers, AuthHeaders, Credential};
pub use config::InsightsConfig;
pub use engine::{FetchPlan, RunStats};
pub use error::{Error, Result};
pub use events::{PageEvent, PageObserver, TracingObserver};
pub use http::{HttpClient, Transport};
pub use pagination::{Page, PageFetcher, PageStream, PaginationMeta, RequestParams};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
