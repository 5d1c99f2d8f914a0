//! The `run` command: extract, normalize, load.
//!
//! Only setup failures (HTTP client, selectors) are returned as errors.
//! Everything after that is logged and absorbed by the stage that hit it.

use std::time::Duration;

use anyhow::Context;

use fstudio_core::{
    AppConfig, NormalizedProductRecord, RawProductRecord, INVALID_RATING, PRICE_NOT_AVAILABLE,
    UNKNOWN_TITLE,
};
use fstudio_scraper::{normalize, FashionClient, Harvester};

/// Rows shown in each table preview.
const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunOptions {
    pub(crate) pages: Option<u32>,
    pub(crate) delay_secs: Option<u64>,
    pub(crate) dry_run: bool,
}

pub(crate) async fn run_pipeline(config: &AppConfig, options: RunOptions) -> anyhow::Result<()> {
    let total_pages = options.pages.unwrap_or(config.total_pages);
    let delay_secs = options.delay_secs.unwrap_or(config.page_delay_secs);

    let client = FashionClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )
    .context("failed to build scraper HTTP client")?;
    let harvester = Harvester::new().context("failed to compile card selectors")?;

    tracing::info!(
        base_url = %config.base_url,
        total_pages,
        delay_secs,
        "starting extraction"
    );
    let raw = fstudio_scraper::run(
        &client,
        &harvester,
        &config.base_url,
        total_pages,
        Duration::from_secs(delay_secs),
    )
    .await;

    if raw.is_empty() {
        tracing::warn!("no products extracted; stopping before normalization");
        return Ok(());
    }
    log_raw_summary(&raw);

    let rows = normalize(&raw, config.coercion_policy);
    log_normalized_summary(&rows);

    if options.dry_run {
        tracing::info!(rows = rows.len(), "dry run; skipping load");
        return Ok(());
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.scraper_request_timeout_secs))
        .build()
        .context("failed to build sink HTTP client")?;
    let report = fstudio_load::load_all(config, &http, &rows).await;

    let failed = report.failures().count();
    if failed == 0 {
        tracing::info!(rows = rows.len(), "ETL run complete");
    } else {
        tracing::warn!(
            rows = rows.len(),
            failed_sinks = failed,
            "ETL run complete with sink failures"
        );
    }
    Ok(())
}

/// Placeholder counts for the raw table.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RawSummary {
    pub(crate) rows: usize,
    pub(crate) unknown_titles: usize,
    pub(crate) missing_prices: usize,
    pub(crate) invalid_ratings: usize,
}

pub(crate) fn summarize_raw(raw: &[RawProductRecord]) -> RawSummary {
    raw.iter().fold(
        RawSummary {
            rows: raw.len(),
            ..RawSummary::default()
        },
        |mut acc, r| {
            acc.unknown_titles += usize::from(r.title == UNKNOWN_TITLE);
            acc.missing_prices += usize::from(r.price == PRICE_NOT_AVAILABLE);
            acc.invalid_ratings += usize::from(r.rating == INVALID_RATING);
            acc
        },
    )
}

/// Null counts for the normalized table.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct NormalizedSummary {
    pub(crate) rows: usize,
    pub(crate) missing_ratings: usize,
    pub(crate) missing_timestamps: usize,
}

pub(crate) fn summarize_normalized(rows: &[NormalizedProductRecord]) -> NormalizedSummary {
    NormalizedSummary {
        rows: rows.len(),
        missing_ratings: rows.iter().filter(|r| r.rating.is_none()).count(),
        missing_timestamps: rows.iter().filter(|r| r.timestamp.is_none()).count(),
    }
}

fn log_raw_summary(raw: &[RawProductRecord]) {
    let summary = summarize_raw(raw);
    tracing::info!(
        rows = summary.rows,
        unknown_titles = summary.unknown_titles,
        missing_prices = summary.missing_prices,
        invalid_ratings = summary.invalid_ratings,
        "extraction complete"
    );
    for (index, r) in raw.iter().take(PREVIEW_ROWS).enumerate() {
        tracing::info!(
            index,
            title = %r.title,
            price = %r.price,
            rating = %r.rating,
            colors = %r.colors,
            size = %r.size,
            gender = %r.gender,
            "raw row"
        );
    }
}

fn log_normalized_summary(rows: &[NormalizedProductRecord]) {
    let summary = summarize_normalized(rows);
    tracing::info!(
        rows = summary.rows,
        missing_ratings = summary.missing_ratings,
        missing_timestamps = summary.missing_timestamps,
        "normalization complete"
    );
    for (index, r) in rows.iter().take(PREVIEW_ROWS).enumerate() {
        tracing::info!(
            index,
            title = %r.title,
            price = r.price,
            rating = ?r.rating,
            colors = r.colors,
            size = %r.size,
            gender = %r.gender,
            timestamp = ?r.timestamp,
            "normalized row"
        );
    }
}
