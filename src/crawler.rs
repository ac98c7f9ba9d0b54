//! Category crawling and article text extraction.
//!
//! The crawl is shared by every [`NewsSource`] and follows a two-phase
//! pattern per category:
//!
//! 1. **Indexing**: fetch the listing page and collect `(title, link)` pairs
//!    from the anchors the source selects.
//! 2. **Fetching**: download each linked article, one at a time, and pull the
//!    paragraph text out of the source's content container.
//!
//! Every candidate ends up as `Result<ArticleRecord, SkipReason>`; failures
//! are logged and counted, never propagated to the caller.

use crate::error::ScrapeError;
use crate::fetch::Fetch;
use crate::models::{ArticleRecord, CategoryReport, SkipReason};
use crate::scrapers::{NewsSource, stripped_text};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));

/// A listing anchor that passed title lookup and URL resolution.
#[derive(Debug)]
struct Candidate {
    title: String,
    link: Url,
}

/// Crawl every category of `source`, in configured order.
///
/// Categories whose listing page cannot be fetched contribute nothing.
#[instrument(level = "info", skip_all, fields(source = source.prefix()))]
pub async fn crawl_all_categories(
    source: &dyn NewsSource,
    fetcher: &dyn Fetch,
) -> Vec<ArticleRecord> {
    let base = match Url::parse(source.base_url()) {
        Ok(base) => base,
        Err(e) => {
            error!(error = %e, base_url = source.base_url(), "Invalid base URL");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for (category, path) in source.categories() {
        let category_url = match base.join(path) {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, %category, "Cannot build category URL");
                continue;
            }
        };
        info!(%category, url = %category_url, "Scraping category");
        let report = crawl_category(source, fetcher, &category_url, category).await;
        info!(
            %category,
            kept = report.kept(),
            skipped = report.skipped(),
            listing_failed = report.listing_failed,
            "Finished category"
        );
        records.extend(report.records);
    }

    info!(count = records.len(), source = source.name(), "Crawled all categories");
    records
}

/// Crawl one category listing page.
///
/// Records come back in document order of the matching anchors.
#[instrument(level = "info", skip(source, fetcher), fields(source = source.prefix(), url = %category_url))]
pub async fn crawl_category(
    source: &dyn NewsSource,
    fetcher: &dyn Fetch,
    category_url: &Url,
    category: &str,
) -> CategoryReport {
    let html = match fetcher.get_text(category_url.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Listing fetch failed");
            return CategoryReport::listing_failed();
        }
    };

    let candidates = index_candidates(source, &html, category_url);
    debug!(count = candidates.len(), "Indexed listing anchors");

    let outcomes: Vec<Result<ArticleRecord, SkipReason>> = stream::iter(candidates)
        .then(|candidate| async move {
            match candidate {
                Ok(candidate) => build_record(source, fetcher, candidate, category).await,
                Err(reason) => Err(reason),
            }
        })
        .collect()
        .await;

    let mut report = CategoryReport::default();
    for outcome in outcomes {
        match &outcome {
            Err(reason @ SkipReason::FetchFailed { .. }) => warn!(%reason, "Article fetch failed"),
            Err(reason) => debug!(%reason, "Skipped candidate"),
            Ok(_) => {}
        }
        report.push(outcome);
    }
    report
}

/// Parse a listing page into candidates, resolving each href against the page URL.
fn index_candidates(
    source: &dyn NewsSource,
    html: &str,
    category_url: &Url,
) -> Vec<Result<Candidate, SkipReason>> {
    let doc = Html::parse_document(html);
    source
        .listing_anchors(&doc)
        .into_iter()
        .map(|anchor| -> Result<Candidate, SkipReason> {
            let title = source.anchor_title(anchor).ok_or(SkipReason::MissingTitle)?;
            let href = anchor.value().attr("href").ok_or(SkipReason::MissingHref)?;
            let link = category_url
                .join(href)
                .map_err(|_| SkipReason::BadLink(href.to_string()))?;
            Ok(Candidate { title, link })
        })
        .collect()
}

async fn build_record(
    source: &dyn NewsSource,
    fetcher: &dyn Fetch,
    candidate: Candidate,
    category: &str,
) -> Result<ArticleRecord, SkipReason> {
    let url = candidate.link.to_string();
    let text = fetch_article_text(source, fetcher, &url)
        .await
        .map_err(|e| SkipReason::FetchFailed {
            url: url.clone(),
            error: e.to_string(),
        })?;
    if text.is_empty() {
        return Err(SkipReason::EmptyText { url });
    }

    debug!(title = %truncate_for_log(&candidate.title, 60), %url, "Kept article");
    Ok(ArticleRecord {
        category: category.to_string(),
        title: candidate.title,
        link: url,
        text,
        metadata: source.record_metadata(),
    })
}

/// Fetch an article and extract its text, logging and swallowing any failure.
///
/// Returns an empty string when the page cannot be fetched.
pub async fn extract_text(source: &dyn NewsSource, fetcher: &dyn Fetch, article_url: &str) -> String {
    match fetch_article_text(source, fetcher, article_url).await {
        Ok(text) => text,
        Err(e) => {
            error!(error = %e, url = article_url, "Article fetch failed");
            String::new()
        }
    }
}

/// Fetch an article and extract its text.
#[instrument(level = "debug", skip(source, fetcher))]
pub async fn fetch_article_text(
    source: &dyn NewsSource,
    fetcher: &dyn Fetch,
    article_url: &str,
) -> Result<String, ScrapeError> {
    let body = fetcher.get_text(article_url).await?;
    let text = article_text(source, &body);
    if text.is_empty() {
        warn!(url = article_url, "Article produced no text");
    } else {
        debug!(bytes = text.len(), "Parsed article");
    }
    Ok(text)
}

/// Paragraph text of an article page.
///
/// Uses the source's content container, or the whole document when the
/// container is missing. Paragraphs are stripped and joined with one space.
pub fn article_text(source: &dyn NewsSource, html: &str) -> String {
    let doc = Html::parse_document(html);
    let container = source
        .content_container(&doc)
        .unwrap_or_else(|| doc.root_element());
    container
        .select(&PARAGRAPH)
        .map(stripped_text)
        .collect::<Vec<_>>()
        .join(" ")
}
