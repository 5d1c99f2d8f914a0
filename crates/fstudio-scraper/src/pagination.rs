//! Sequential crawl over the numbered listing pages.
//!
//! Page 1 lives at the listing URL itself; page `n >= 2` lives at
//! `{listing}/page{n}`. Pages are fetched one at a time with a fixed pause
//! between them, and the first fetch failure ends the crawl.

use std::time::Duration;

use fstudio_core::RawProductRecord;

use crate::client::PageFetcher;
use crate::error::ScraperError;
use crate::harvest::Harvester;

/// Builds the URL for listing page `page` (1-based).
///
/// # Errors
///
/// Returns [`ScraperError::InvalidBaseUrl`] if `listing_url` is not an
/// absolute URL.
pub fn page_url(listing_url: &str, page: u32) -> Result<String, ScraperError> {
    reqwest::Url::parse(listing_url).map_err(|e| ScraperError::InvalidBaseUrl {
        base_url: listing_url.to_owned(),
        reason: e.to_string(),
    })?;

    if page <= 1 {
        return Ok(listing_url.to_owned());
    }
    Ok(format!("{}/page{page}", listing_url.trim_end_matches('/')))
}

/// Crawls pages `1..=total_pages` and returns every harvested record in page
/// order.
///
/// A fetch error stops the crawl; records from earlier pages are kept and
/// later pages are never requested.
pub async fn run<F: PageFetcher>(
    fetcher: &F,
    harvester: &Harvester,
    listing_url: &str,
    total_pages: u32,
    delay: Duration,
) -> Vec<RawProductRecord> {
    let mut records = Vec::new();

    for page in 1..=total_pages {
        let url = match page_url(listing_url, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(page, error = %e, "cannot build page URL; stopping");
                break;
            }
        };

        tracing::info!(page, total_pages, url = %url, "fetching listing page");
        let content = match fetcher.fetch_page(&url).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(page, url = %url, error = %e, "fetch failed; stopping pagination");
                break;
            }
        };

        let harvested = harvester.harvest(&content);
        tracing::info!(page, records = harvested.len(), "harvested page");
        records.extend(harvested);

        if page < total_pages && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    tracing::info!(records = records.len(), "pagination finished");
    records
}
