//! CNN Arabic (arabic.cnn.com) markup rules.
//!
//! Listing pages are scanned loosely: every anchor with an `href` is a
//! candidate, and only those with an `h3` (or failing that, a `span`) inside
//! are kept. Article bodies live in the first `article` element.
//!
//! Records from this source carry a scrape timestamp and a fixed `real`
//! label, which the Al Jazeera records do not.

use super::{NewsSource, stripped_text};
use crate::models::RecordMetadata;
use chrono::Local;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static H3: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").expect("valid selector"));
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").expect("valid selector"));
static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("valid selector"));

const CATEGORIES: &[(&str, &str)] = &[
    ("middle-east", "middle-east"),
    ("travel", "travel"),
    ("sport", "sport"),
    ("science-and-health", "science-and-health"),
    ("entertainment", "entertainment"),
    ("style", "style"),
    ("world", "world"),
];

const LABEL: &str = "real";

#[derive(Debug, Clone, Copy)]
pub struct CnnArabic;

impl NewsSource for CnnArabic {
    fn name(&self) -> &'static str {
        "CNN Arabic"
    }

    fn prefix(&self) -> &'static str {
        "CNN-Arabic"
    }

    fn base_url(&self) -> &'static str {
        "https://arabic.cnn.com/"
    }

    fn categories(&self) -> &'static [(&'static str, &'static str)] {
        CATEGORIES
    }

    fn listing_anchors<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        doc.select(&LINK).collect()
    }

    fn anchor_title(&self, anchor: ElementRef<'_>) -> Option<String> {
        anchor
            .select(&H3)
            .next()
            .or_else(|| anchor.select(&SPAN).next())
            .map(stripped_text)
    }

    fn content_container<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        doc.select(&ARTICLE).next()
    }

    fn record_metadata(&self) -> Option<RecordMetadata> {
        Some(RecordMetadata {
            scraped_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            label: LABEL.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_h3_over_span() {
        let doc = Html::parse_document(
            r#"<html><body>
                <a href="/a"><span>ثانوي</span><h3>رئيسي</h3></a>
                <a href="/b"><span>احتياطي</span></a>
                <a href="/c">نص فقط</a>
                <a name="anchor"><h3>بلا رابط</h3></a>
            </body></html>"#,
        );
        let anchors = CnnArabic.listing_anchors(&doc);
        assert_eq!(anchors.len(), 3);
        assert_eq!(CnnArabic.anchor_title(anchors[0]).as_deref(), Some("رئيسي"));
        assert_eq!(CnnArabic.anchor_title(anchors[1]).as_deref(), Some("احتياطي"));
        assert_eq!(CnnArabic.anchor_title(anchors[2]), None);
    }

    #[test]
    fn test_record_metadata_format() {
        let metadata = CnnArabic.record_metadata().unwrap();
        assert_eq!(metadata.label, "real");
        assert!(
            chrono::NaiveDateTime::parse_from_str(&metadata.scraped_at, "%Y-%m-%d %H:%M:%S")
                .is_ok()
        );
    }
}
