//! Configuration for an insights fetch
//!
//! `InsightsConfig` is loaded from a YAML or JSON file (or built in code),
//! validated, and resolved into an endpoint, an [`HttpClientConfig`] and a
//! [`FetchPlan`]. The secret is never part of the file; only the name of
//! the environment variable holding it is.

use crate::auth::Credential;
use crate::engine::{FetchPlan, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::http::{default_user_agent, HttpClientConfig, RateLimiterConfig};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::Path;
use url::Url;

/// Graph API host used when no endpoint is configured
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";

/// Graph API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "v15.0";

/// Environment variable read for the secret by default
pub const DEFAULT_SECRET_ENV: &str = "INSTAGRAM_API_SECRET_KEY";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete fetch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Full insights endpoint; takes precedence over `account_id`
    #[serde(default)]
    pub endpoint: Option<Url>,

    /// Instagram business account id used to build the endpoint
    #[serde(default)]
    pub account_id: Option<String>,

    /// Graph API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Graph API host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Metrics to fetch, in order
    #[serde(default)]
    pub metrics: Vec<String>,

    /// Inclusive start of the window
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,

    /// Inclusive end of the window
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,

    /// Relative window used when neither `since` nor `until` is set
    #[serde(default)]
    pub window: Option<RelativeWindow>,

    /// Page-size hint
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Page limit for each metric
    #[serde(default = "default_max_pages")]
    pub max_pages_per_metric: NonZeroU32,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Environment variable holding the secret
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_pages() -> NonZeroU32 {
    DEFAULT_MAX_PAGES
}

fn default_secret_env() -> String {
    DEFAULT_SECRET_ENV.to_string()
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            account_id: None,
            api_version: default_api_version(),
            base_url: default_base_url(),
            metrics: Vec::new(),
            since: None,
            until: None,
            window: None,
            page_size: default_page_size(),
            max_pages_per_metric: default_max_pages(),
            http: HttpConfig::default(),
            secret_env: default_secret_env(),
        }
    }
}

// ============================================================================
// Window
// ============================================================================

/// Window relative to the time of the run
///
/// `since = now - lookback_days`, `until = now - lag_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeWindow {
    /// Days back the window starts
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Days back the window ends; insights lag by a day or two
    #[serde(default = "default_lag_days")]
    pub lag_days: u32,
}

fn default_lookback_days() -> u32 {
    60
}

fn default_lag_days() -> u32 {
    2
}

impl Default for RelativeWindow {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            lag_days: default_lag_days(),
        }
    }
}

impl RelativeWindow {
    /// Resolve against `now`
    pub fn resolve(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            now - Duration::days(i64::from(self.lookback_days)),
            now - Duration::days(i64::from(self.lag_days)),
        )
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Optional client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            rate_limit: None,
        }
    }
}

impl HttpConfig {
    /// Build the transport configuration
    pub fn to_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .user_agent(self.user_agent.clone().unwrap_or_else(default_user_agent));
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        builder.build()
    }
}

// ============================================================================
// Loading and resolution
// ============================================================================

impl InsightsConfig {
    /// Load from a file; `.yaml`/`.yml` is read as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        if is_yaml {
            Self::from_yaml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    /// Parse YAML
    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Parse JSON
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Check the config for errors that would only surface mid-run
    pub fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(Error::missing_field("metrics"));
        }
        if self.metrics.iter().any(|m| m.trim().is_empty()) {
            return Err(Error::invalid_value("metrics", "metric names must not be empty"));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(Error::invalid_value(
                    "since",
                    format!("{since} is after until ({until})"),
                ));
            }
        }
        if self.secret_env.is_empty() {
            return Err(Error::invalid_value("secret_env", "must not be empty"));
        }
        self.resolve_endpoint()?;
        Ok(())
    }

    /// The insights endpoint
    ///
    /// `endpoint` if set, otherwise
    /// `{base_url}/{api_version}/{account_id}/insights`.
    pub fn resolve_endpoint(&self) -> Result<Url> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }
        let account_id = self
            .account_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::missing_field("account_id"))?;
        let url = format!(
            "{}/{}/{}/insights",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            account_id
        );
        Ok(Url::parse(&url)?)
    }

    /// The window to request
    ///
    /// Explicit bounds are used as given, even if only one is set. The
    /// relative window applies only when both are absent.
    pub fn resolve_window(
        &self,
        now: DateTime<Utc>,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match (self.since, self.until, self.window) {
            (None, None, Some(window)) => {
                let (since, until) = window.resolve(now);
                (Some(since), Some(until))
            }
            (since, until, _) => (since, until),
        }
    }

    /// Validate and build the fetch plan, resolving relative windows at `now`
    pub fn plan(&self, now: DateTime<Utc>) -> Result<FetchPlan> {
        self.validate()?;
        let (since, until) = self.resolve_window(now);
        Ok(FetchPlan::new(self.metrics.iter().cloned())
            .with_window(since, until)
            .with_page_size(self.page_size)
            .with_max_pages(self.max_pages_per_metric))
    }

    /// Read the secret from the configured environment variable
    pub fn credential(&self) -> Result<Credential> {
        Credential::from_env(&self.secret_env)
    }
}
