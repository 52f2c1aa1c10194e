//! Rate limiting implementation
//!
//! Uses the governor crate for token bucket rate limiting. Graph API
//! quotas are usually expressed per hour, so the window is configurable.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Window the request allowance applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateWindow {
    #[default]
    Second,
    Minute,
    Hour,
}

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Requests allowed per window
    pub requests: u32,
    /// Window the allowance applies to
    #[serde(default)]
    pub per: RateWindow,
    /// Burst size (max tokens in bucket), defaults to `requests`
    #[serde(default)]
    pub burst_size: Option<u32>,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests: 200,
            per: RateWindow::Hour,
            burst_size: None,
        }
    }
}

impl RateLimiterConfig {
    /// Allow `requests` per second
    pub fn per_second(requests: u32) -> Self {
        Self {
            requests,
            per: RateWindow::Second,
            burst_size: None,
        }
    }

    /// Allow `requests` per hour
    pub fn per_hour(requests: u32) -> Self {
        Self {
            requests,
            per: RateWindow::Hour,
            burst_size: None,
        }
    }

    /// Set the burst size
    #[must_use]
    pub fn with_burst(mut self, burst: u32) -> Self {
        self.burst_size = Some(burst);
        self
    }

    fn quota(&self) -> Quota {
        let requests = NonZeroU32::new(self.requests).unwrap_or(NonZeroU32::MIN);
        let burst = self
            .burst_size
            .and_then(NonZeroU32::new)
            .unwrap_or(requests);
        let quota = match self.per {
            RateWindow::Second => Quota::per_second(requests),
            RateWindow::Minute => Quota::per_minute(requests),
            RateWindow::Hour => Quota::per_hour(requests),
        };
        quota.allow_burst(burst)
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
