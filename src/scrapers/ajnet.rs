//! Al Jazeera Net (ajnet.me) markup rules.
//!
//! Category listings link articles through card anchors carrying the
//! `u-clickable-card__link` class; the headline is the first `span` inside
//! the card. Article bodies live in a `div.wysiwyg`.

use super::{NewsSource, stripped_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static CARD_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.u-clickable-card__link").expect("valid selector"));
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").expect("valid selector"));
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("div.wysiwyg").expect("valid selector"));

const CATEGORIES: &[(&str, &str)] = &[
    ("politics", "politics/"),
    ("business", "ebusiness/"),
    ("culture", "culture/"),
    ("sport", "sport/"),
    ("tech", "tech/"),
    ("opinion", "opinion/"),
    ("turath", "turath/"),
    ("arts", "arts/"),
    ("science", "science/"),
    ("midan", "midan/"),
    ("lifestyle", "lifestyle/"),
    ("family", "family/"),
];

#[derive(Debug, Clone, Copy)]
pub struct AlJazeeraNet;

impl NewsSource for AlJazeeraNet {
    fn name(&self) -> &'static str {
        "Al Jazeera Net"
    }

    fn prefix(&self) -> &'static str {
        "Ajnet"
    }

    fn base_url(&self) -> &'static str {
        "https://www.ajnet.me/"
    }

    fn categories(&self) -> &'static [(&'static str, &'static str)] {
        CATEGORIES
    }

    fn listing_anchors<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        doc.select(&CARD_LINK).collect()
    }

    fn anchor_title(&self, anchor: ElementRef<'_>) -> Option<String> {
        anchor.select(&SPAN).next().map(stripped_text)
    }

    fn content_container<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        doc.select(&BODY).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_anchors_require_card_class() {
        let doc = Html::parse_document(
            r#"<html><body>
                <a class="u-clickable-card__link" href="/news/1"><span>أول</span></a>
                <a href="/news/2"><span>ثاني</span></a>
                <a class="card u-clickable-card__link" href="/news/3"><div>بلا عنوان</div></a>
            </body></html>"#,
        );
        let anchors = AlJazeeraNet.listing_anchors(&doc);
        assert_eq!(anchors.len(), 2);
        assert_eq!(AlJazeeraNet.anchor_title(anchors[0]).as_deref(), Some("أول"));
        assert_eq!(AlJazeeraNet.anchor_title(anchors[1]), None);
    }

    #[test]
    fn test_content_container_is_wysiwyg_div() {
        let doc = Html::parse_document(
            r#"<html><body><p>خارج</p><div class="wysiwyg wysiwyg--all-content"><p>داخل</p></div></body></html>"#,
        );
        let container = AlJazeeraNet.content_container(&doc).unwrap();
        assert_eq!(stripped_text(container), "داخل");
    }

    #[test]
    fn test_categories_are_ordered() {
        let keys: Vec<_> = AlJazeeraNet.categories().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.first(), Some(&"politics"));
        assert_eq!(keys.last(), Some(&"family"));
        assert_eq!(keys.len(), 12);
        assert_eq!(AlJazeeraNet.record_metadata(), None);
    }
}
