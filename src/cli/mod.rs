//! CLI module
//!
//! Command-line interface for fetching insights.
//!
//! # Commands
//!
//! - `read` - Fetch every page of every metric
//! - `check` - Fetch a single page to test the credential
//! - `plan` - Show the resolved plan without network access

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchArgs, OutputFormat};
pub use runner::{apply_overrides, build_fetcher, page_message, Runner};
