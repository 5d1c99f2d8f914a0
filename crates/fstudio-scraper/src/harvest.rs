//! Page-level harvesting: locate product cards and extract each one.

use std::borrow::Cow;

use scraper::Html;

use fstudio_core::RawProductRecord;

use crate::error::ScraperError;
use crate::extract::{extract, CardSelectors};

/// Turns listing-page content into raw product records.
#[derive(Debug)]
pub struct Harvester {
    selectors: CardSelectors,
}

impl Harvester {
    /// # Errors
    ///
    /// Returns [`ScraperError::Selector`] if the card selectors fail to compile.
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            selectors: CardSelectors::new()?,
        })
    }

    /// Extracts every product card in `page_content`, in document order.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD rather than dropping
    /// the page. A page without cards is logged and yields an empty vector.
    #[must_use]
    pub fn harvest(&self, page_content: &[u8]) -> Vec<RawProductRecord> {
        let html = String::from_utf8_lossy(page_content);
        if let Cow::Owned(_) = html {
            tracing::warn!(
                bytes = page_content.len(),
                "page content is not valid UTF-8; decoded lossily"
            );
        }

        let document = Html::parse_document(&html);
        let records: Vec<RawProductRecord> = document
            .select(&self.selectors.card)
            .map(|card| extract(card, &self.selectors))
            .collect();

        if records.is_empty() {
            tracing::warn!("no product cards found on page");
        } else {
            tracing::debug!(cards = records.len(), "extracted product cards");
        }
        records
    }
}
