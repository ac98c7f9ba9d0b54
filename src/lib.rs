//! # Arabic News Snapshots
//!
//! Crawls the category pages of Arabic-language news sites, extracts each
//! linked article's body text, and stores the results as dated CSV
//! snapshots. A small web app adds accounts and an on-demand endpoint that
//! returns a combined CSV of every source for a given day.
//!
//! ## Sources
//!
//! - Al Jazeera Net (`Ajnet-<date>.csv`)
//! - CNN Arabic (`CNN-Arabic-<date>.csv`, with extra `ScrapedAt`/`Label` columns)
//!
//! ## Architecture
//!
//! 1. **Crawling** ([`crawler`]): listing page → `(title, link)` pairs → article
//!    text, strictly one request at a time
//! 2. **Snapshots** ([`snapshot`]): one CSV per source per day; an existing file
//!    short-circuits the crawl
//! 3. **Export** ([`export`]): merge every source's snapshot into
//!    `Combined-<date>.csv`, rebuilt on each call
//! 4. **Web** ([`web`]): signup/login/logout and `GET /scrape?date=`

pub mod cli;
pub mod config;
pub mod crawler;
pub mod db;
pub mod error;
pub mod export;
pub mod fetch;
pub mod models;
pub mod scrapers;
pub mod snapshot;
pub mod utils;
pub mod web;

pub use error::{AppError, ScrapeError};
pub use models::{ArticleRecord, CategoryReport, SkipReason};
