//! CLI runner - executes commands

use crate::auth::Credential;
use crate::cli::commands::{Cli, Commands, FetchArgs, OutputFormat};
use crate::config::InsightsConfig;
use crate::engine::{self, RunStats};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{Page, PageFetcher, PageStream};
use chrono::Utc;
use futures::StreamExt;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use url::Url;

type Sink = Box<dyn Write + Send>;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Read { args, output } => self.read(args, output.as_deref()).await,
            Commands::Check { args } => self.check(args).await,
            Commands::Plan { args } => self.plan(args),
        }
    }

    /// Load the config file (if any) and apply command-line overrides
    fn load_config(&self, args: &FetchArgs) -> Result<InsightsConfig> {
        let mut config = match &self.cli.config {
            Some(path) => InsightsConfig::from_file(path)?,
            None => InsightsConfig::default(),
        };
        apply_overrides(&mut config, args)?;
        Ok(config)
    }

    /// Fetch every page and write one message per page
    async fn read(&self, args: &FetchArgs, output: Option<&Path>) -> Result<()> {
        let started = Instant::now();
        let config = self.load_config(args)?;
        let plan = config.plan(Utc::now())?;
        let secret = config.credential()?;
        let fetcher = build_fetcher(&config, &secret)?;

        let mut sink: Sink = match output {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(BufWriter::new(std::io::stdout())),
        };

        info!(
            endpoint = %fetcher.endpoint(),
            metrics = plan.metrics.len(),
            max_pages = plan.max_pages_per_metric.get(),
            "Starting read"
        );

        let mut stats = RunStats::new();
        let mut pages = engine::run(&fetcher, &plan);
        let outcome = self.write_pages(&mut pages, &mut sink, &mut stats).await;
        sink.flush()?;

        for (metric, count) in &stats.metrics {
            info!(metric = %metric, pages = count, "Metric summary");
        }
        info!(
            pages = stats.pages,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = outcome.is_ok(),
            "Read finished"
        );
        outcome
    }

    async fn write_pages(
        &self,
        pages: &mut PageStream<'_>,
        sink: &mut Sink,
        stats: &mut RunStats,
    ) -> Result<()> {
        while let Some(page) = pages.next().await {
            let page = page?;
            self.write_message(sink, &page_message(&page))?;
            stats.record(&page);
        }
        Ok(())
    }

    /// Fetch one page of the first metric
    async fn check(&self, args: &FetchArgs) -> Result<()> {
        let config = self.load_config(args)?;
        let plan = config
            .plan(Utc::now())?
            .with_max_pages(NonZeroU32::MIN);
        let secret = config.credential()?;
        let fetcher = build_fetcher(&config, &secret)?;
        let metric = plan
            .metrics
            .first()
            .ok_or_else(|| Error::missing_field("metrics"))?;

        let mut pages = engine::run_metric(&fetcher, &plan, metric);
        let (status, message) = match pages.next().await {
            Some(Ok(_)) => ("SUCCEEDED", "Connection successful".to_string()),
            Some(Err(e)) => ("FAILED", format!("Connection failed: {e}")),
            None => ("FAILED", "Connection failed: no response".to_string()),
        };

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": message
            }
        }));

        Ok(())
    }

    /// Print the resolved plan
    fn plan(&self, args: &FetchArgs) -> Result<()> {
        let config = self.load_config(args)?;
        let plan = config.plan(Utc::now())?;
        let endpoint = config.resolve_endpoint()?;

        self.output_message(&json!({
            "type": "PLAN",
            "endpoint": endpoint.as_str(),
            "secret_env": config.secret_env,
            "plan": plan
        }));
        Ok(())
    }

    fn format_message(&self, msg: &Value) -> Result<String> {
        Ok(match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        })
    }

    fn write_message(&self, sink: &mut Sink, msg: &Value) -> Result<()> {
        writeln!(sink, "{}", self.format_message(msg)?)?;
        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.format_message(msg) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}

/// Apply command-line values on top of a loaded config
pub fn apply_overrides(config: &mut InsightsConfig, args: &FetchArgs) -> Result<()> {
    if let Some(metrics) = &args.metrics {
        config.metrics = metrics
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(account_id) = &args.account_id {
        config.account_id = Some(account_id.clone());
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = Some(Url::parse(endpoint)?);
    }
    if args.since.is_some() {
        config.since = args.since;
    }
    if args.until.is_some() {
        config.until = args.until;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages_per_metric = max_pages;
    }
    if let Some(secret_env) = &args.secret_env {
        config.secret_env = secret_env.clone();
    }
    Ok(())
}

/// Build a fetcher over the reqwest transport
pub fn build_fetcher(config: &InsightsConfig, secret: &Credential) -> Result<PageFetcher> {
    let endpoint = config.resolve_endpoint()?;
    let client = HttpClient::with_config(config.http.to_client_config())?;
    Ok(PageFetcher::for_credential(Arc::new(client), endpoint, secret))
}

/// One output line for a page
pub fn page_message(page: &Page) -> Value {
    json!({
        "type": "PAGE",
        "metric": page.metric,
        "index": page.index,
        "next": page.meta.next,
        "body": page.body
    })
}
