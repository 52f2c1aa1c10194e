//! HTTP transport module
//!
//! Provides the [`Transport`] seam the paginated fetcher depends on and a
//! reqwest implementation of it.
//!
//! # Features
//!
//! - **Single attempt**: every call is exactly one request, no retries
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Timeouts**: per-client request timeout

mod client;
mod rate_limit;

pub use client::{
    default_user_agent, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RawResponse,
    Transport,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig, RateWindow};

#[cfg(test)]
mod tests;
