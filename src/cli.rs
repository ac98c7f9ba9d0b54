//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Options that also live in the settings file override it when given;
//! most can be provided through environment variables as well.

use crate::scrapers::SourceKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Serve the web app with accounts
/// arabic_news_snapshots serve --bind 0.0.0.0:8000
///
/// # Open API variant, no accounts required for /scrape
/// arabic_news_snapshots serve --no-auth
///
/// # Build today's combined export once and exit
/// arabic_news_snapshots scrape
///
/// # Snapshot a single source for a given day
/// arabic_news_snapshots snapshot cnn-arabic --date 2024-01-01
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "NEWS_SETTINGS")]
    pub config: Option<PathBuf>,

    /// Directory holding snapshot and combined CSV files
    #[arg(short, long, env = "NEWS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the web server
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8000
        #[arg(short, long, env = "NEWS_BIND")]
        bind: Option<String>,

        /// SQLite URL of the accounts database
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Serve /scrape without requiring a signed-in user
        #[arg(long)]
        no_auth: bool,
    },

    /// Build the combined export for a date and print its path
    Scrape {
        /// Date in YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Ensure a single source's snapshot exists and print its path
    Snapshot {
        #[arg(value_enum)]
        source: SourceKind,

        /// Date in YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}
