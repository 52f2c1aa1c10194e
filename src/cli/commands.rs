//! CLI commands and argument parsing

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Instagram insights fetcher
#[derive(Parser, Debug)]
#[command(name = "instagram-insights")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Values that override the configuration file
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Metrics to fetch (comma-separated)
    #[arg(long)]
    pub metrics: Option<String>,

    /// Instagram account id
    #[arg(long)]
    pub account_id: Option<String>,

    /// Full insights endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Start of the window (RFC 3339)
    #[arg(long)]
    pub since: Option<DateTime<Utc>>,

    /// End of the window (RFC 3339)
    #[arg(long)]
    pub until: Option<DateTime<Utc>>,

    /// Page-size hint
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Page limit per metric
    #[arg(long)]
    pub max_pages: Option<NonZeroU32>,

    /// Environment variable holding the API secret
    #[arg(long)]
    pub secret_env: Option<String>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all pages for every metric
    Read {
        #[command(flatten)]
        args: FetchArgs,

        /// Write pages to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch a single page to verify the endpoint and credential
    Check {
        #[command(flatten)]
        args: FetchArgs,
    },

    /// Show the resolved fetch plan without making requests
    Plan {
        #[command(flatten)]
        args: FetchArgs,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
