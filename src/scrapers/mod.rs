//! News sources and the markup rules used to scrape them.
//!
//! Each source is a unit struct implementing [`NewsSource`]. The trait only
//! describes *where* things live in a source's markup; the crawl itself
//! (fetching, URL resolution, skip bookkeeping) is shared in
//! [`crate::crawler`].
//!
//! # Supported Sources
//!
//! | Source | Module | Listing anchors | Title | Content container |
//! |--------|--------|-----------------|-------|-------------------|
//! | Al Jazeera Net | [`ajnet`] | `a.u-clickable-card__link` | `span` | `div.wysiwyg` |
//! | CNN Arabic | [`cnn_arabic`] | any `a[href]` | `h3`, else `span` | `article` |
//!
//! Only CNN Arabic stamps `ScrapedAt`/`Label` on its records, so the two
//! snapshot files have different column sets.

pub mod ajnet;
pub mod cnn_arabic;

use crate::models::{BASE_COLUMNS, METADATA_COLUMNS, RecordMetadata};
use clap::ValueEnum;
use scraper::{ElementRef, Html};

pub use ajnet::AlJazeeraNet;
pub use cnn_arabic::CnnArabic;

/// Markup rules and static configuration for one news site.
pub trait NewsSource: Send + Sync {
    /// Human readable name used in logs.
    fn name(&self) -> &'static str;

    /// File name prefix of this source's snapshots, e.g. `Ajnet`.
    fn prefix(&self) -> &'static str;

    /// Site root that category paths are resolved against.
    fn base_url(&self) -> &'static str;

    /// Ordered category key to path segment mapping.
    fn categories(&self) -> &'static [(&'static str, &'static str)];

    /// Anchors on a listing page that point at candidate articles.
    fn listing_anchors<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>>;

    /// Title of a candidate anchor, or `None` when no title element exists.
    fn anchor_title(&self, anchor: ElementRef<'_>) -> Option<String>;

    /// Element enclosing the article body, if the page has one.
    fn content_container<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>>;

    /// Extra fields stamped on each record at creation time.
    fn record_metadata(&self) -> Option<RecordMetadata> {
        None
    }

    /// CSV header for this source's snapshot.
    fn columns(&self) -> Vec<&'static str> {
        let mut columns = BASE_COLUMNS.to_vec();
        if self.record_metadata().is_some() {
            columns.extend(METADATA_COLUMNS);
        }
        columns
    }
}

/// Source selector for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Ajnet,
    CnnArabic,
}

impl SourceKind {
    pub fn source(self) -> &'static dyn NewsSource {
        match self {
            SourceKind::Ajnet => &AlJazeeraNet,
            SourceKind::CnnArabic => &CnnArabic,
        }
    }
}

/// Every configured source, in the order the combined export lists them.
pub fn all_sources() -> [&'static dyn NewsSource; 2] {
    [&AlJazeeraNet, &CnnArabic]
}

/// Text of an element with each text node trimmed and empty pieces dropped.
///
/// Pieces are concatenated without a separator, so inline markup such as
/// `<b>` inside a paragraph does not introduce extra spaces.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}
