//! Data models for scraped articles and per-category crawl outcomes.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One scraped article, ready to be written as a CSV row
//! - [`RecordMetadata`]: Extra columns that only some sources stamp on records
//! - [`SkipReason`]: Why a candidate link on a listing page produced no record
//! - [`CategoryReport`]: Kept records and skip reasons for one category
//!
//! Column names follow the CSV header used by the snapshot files, e.g.
//! `Category,Title,Link,Text` for Al Jazeera Net and the same plus
//! `ScrapedAt,Label` for CNN Arabic.

use std::fmt;

/// Base columns every snapshot carries, in header order.
pub const BASE_COLUMNS: [&str; 4] = ["Category", "Title", "Link", "Text"];

/// Columns added by sources that stamp [`RecordMetadata`] on their records.
pub const METADATA_COLUMNS: [&str; 2] = ["ScrapedAt", "Label"];

/// A single article scraped from a category listing.
///
/// A record only exists when the article's extracted text is non-empty;
/// candidates that fail any stage are reported as a [`SkipReason`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Category key of the source (e.g. `"sport"`).
    pub category: String,
    /// Heading text taken from the listing anchor.
    pub title: String,
    /// Absolute article URL.
    pub link: String,
    /// Paragraph text of the article body, single-space joined.
    pub text: String,
    /// Source-specific extra fields. `None` for sources without them.
    pub metadata: Option<RecordMetadata>,
}

/// Extra per-record fields written by CNN Arabic only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    /// Local wall-clock time the record was built, `YYYY-MM-DD HH:MM:SS`.
    pub scraped_at: String,
    /// Free-form label; CNN Arabic always writes `"real"`.
    pub label: String,
}

impl ArticleRecord {
    /// Render the record as a CSV row matching `columns`.
    ///
    /// Unknown columns, and metadata columns on records without metadata,
    /// render as empty cells.
    pub fn to_row(&self, columns: &[&str]) -> Vec<String> {
        columns
            .iter()
            .map(|column| match *column {
                "Category" => self.category.clone(),
                "Title" => self.title.clone(),
                "Link" => self.link.clone(),
                "Text" => self.text.clone(),
                "ScrapedAt" => self
                    .metadata
                    .as_ref()
                    .map(|m| m.scraped_at.clone())
                    .unwrap_or_default(),
                "Label" => self
                    .metadata
                    .as_ref()
                    .map(|m| m.label.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .collect()
    }
}

/// Why a candidate anchor on a listing page did not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The anchor had no nested title element.
    MissingTitle,
    /// The anchor matched the selector but carried no `href`.
    MissingHref,
    /// The `href` could not be resolved against the category page URL.
    BadLink(String),
    /// Fetching the article failed (network error or non-2xx status).
    FetchFailed { url: String, error: String },
    /// The article was fetched but no paragraph text was found.
    EmptyText { url: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingTitle => write!(f, "no title element"),
            SkipReason::MissingHref => write!(f, "anchor without href"),
            SkipReason::BadLink(href) => write!(f, "unresolvable href {href:?}"),
            SkipReason::FetchFailed { url, error } => write!(f, "fetch of {url} failed: {error}"),
            SkipReason::EmptyText { url } => write!(f, "no text extracted from {url}"),
        }
    }
}

/// Outcome of crawling one category listing page.
#[derive(Debug, Default)]
pub struct CategoryReport {
    pub records: Vec<ArticleRecord>,
    pub skipped: Vec<SkipReason>,
    /// Set when the listing page itself could not be fetched.
    pub listing_failed: bool,
}

impl CategoryReport {
    /// Fold one candidate outcome into the report.
    pub fn push(&mut self, outcome: Result<ArticleRecord, SkipReason>) {
        match outcome {
            Ok(record) => self.records.push(record),
            Err(reason) => self.skipped.push(reason),
        }
    }

    pub fn kept(&self) -> usize {
        self.records.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped.len()
    }

    pub fn listing_failed() -> Self {
        CategoryReport {
            listing_failed: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(metadata: Option<RecordMetadata>) -> ArticleRecord {
        ArticleRecord {
            category: "sport".to_string(),
            title: "عنوان".to_string(),
            link: "https://example.com/a".to_string(),
            text: "نص".to_string(),
            metadata,
        }
    }

    #[test]
    fn test_to_row_without_metadata() {
        let row = record(None).to_row(&BASE_COLUMNS);
        assert_eq!(row, vec!["sport", "عنوان", "https://example.com/a", "نص"]);
    }

    #[test]
    fn test_to_row_metadata_columns_empty_when_absent() {
        let columns = [&BASE_COLUMNS[..], &METADATA_COLUMNS[..]].concat();
        let row = record(None).to_row(&columns);
        assert_eq!(row[4], "");
        assert_eq!(row[5], "");
    }

    #[test]
    fn test_to_row_with_metadata() {
        let columns = [&BASE_COLUMNS[..], &METADATA_COLUMNS[..]].concat();
        let row = record(Some(RecordMetadata {
            scraped_at: "2024-01-01 10:00:00".to_string(),
            label: "real".to_string(),
        }))
        .to_row(&columns);
        assert_eq!(row[4], "2024-01-01 10:00:00");
        assert_eq!(row[5], "real");
    }

    #[test]
    fn test_report_counts() {
        let mut report = CategoryReport::default();
        report.push(Ok(record(None)));
        report.push(Err(SkipReason::MissingTitle));
        report.push(Err(SkipReason::EmptyText {
            url: "https://example.com/b".to_string(),
        }));
        assert_eq!(report.kept(), 1);
        assert_eq!(report.skipped(), 2);
        assert!(!report.listing_failed);
    }
}
