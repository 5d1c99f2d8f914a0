//! HTTP client for the Fashion Studio listing pages.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;

use crate::error::ScraperError;

/// Source of raw listing-page content.
///
/// [`FashionClient`] is the production implementation; the pagination driver
/// is generic over this trait so it can be run against in-memory pages.
pub trait PageFetcher {
    /// Fetches the body of `url`.
    ///
    /// Any `Err` is treated by callers as "no content for this page".
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ScraperError>> + Send;
}

/// Plain `GET` client that presents itself as a desktop browser.
///
/// No retries: a failed request is reported once and the caller decides
/// what to do with it.
pub struct FashionClient {
    client: Client,
}

impl FashionClient {
    /// Creates a `FashionClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the raw response body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] on network, TLS or timeout failure.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.bytes().await?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(body.to_vec())
    }
}

impl PageFetcher for FashionClient {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ScraperError>> + Send {
        self.fetch(url)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
