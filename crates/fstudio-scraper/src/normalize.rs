//! Normalization of the raw product table into typed rows.
//!
//! Rows whose rating is the invalid-rating placeholder are dropped first.
//! Every remaining row is then coerced column by column. What happens when a
//! coercion fails is decided by [`CoercionPolicy`]: the default discards the
//! whole batch, `DropRow` discards only the offending row.

use std::sync::LazyLock;

use regex::Regex;

use fstudio_core::{
    CoercionPolicy, NormalizedProductRecord, RawProductRecord, INVALID_RATING,
};

use crate::error::ScraperError;

/// Source prices are in dollars; rows are stored in rupiah.
pub const EXCHANGE_RATE: f64 = 16_000.0;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

static RATING_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"⭐\s*(\d+\.\d+)").expect("valid regex"));
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Normalizes `raw` under `policy`.
///
/// With [`CoercionPolicy::AbortBatch`] a single coercion failure yields an
/// empty vector. Input order is preserved for every row that survives.
#[must_use]
pub fn normalize(raw: &[RawProductRecord], policy: CoercionPolicy) -> Vec<NormalizedProductRecord> {
    let mut rows = Vec::with_capacity(raw.len());
    let mut invalid_ratings = 0usize;

    for (row, record) in raw.iter().enumerate() {
        if record.rating == INVALID_RATING {
            invalid_ratings += 1;
            continue;
        }

        match normalize_record(row, record) {
            Ok(normalized) => rows.push(normalized),
            Err(e) => match policy {
                CoercionPolicy::AbortBatch => {
                    tracing::error!(
                        error = %e,
                        rows = raw.len(),
                        "normalization failed; discarding batch"
                    );
                    return Vec::new();
                }
                CoercionPolicy::DropRow => {
                    tracing::warn!(row, error = %e, "dropping row that failed coercion");
                }
            },
        }
    }

    tracing::info!(
        input_rows = raw.len(),
        output_rows = rows.len(),
        invalid_ratings,
        policy = %policy,
        "normalized product table"
    );
    rows
}

/// Coerces one raw row. `row` is the row's index in the input table and is
/// only used for error reporting.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] when the price is not numeric or
/// the colour count has no digits.
pub fn normalize_record(
    row: usize,
    record: &RawProductRecord,
) -> Result<NormalizedProductRecord, ScraperError> {
    Ok(NormalizedProductRecord {
        title: record.title.clone(),
        price: parse_price(row, &record.price)?,
        rating: parse_rating(&record.rating),
        colors: parse_colors(row, &record.colors)?,
        size: record.size.clone(),
        gender: record.gender.clone(),
        timestamp: record
            .fetched_at
            .resolve()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string()),
    })
}

/// Extracts the decimal after the star glyph; `None` when absent.
fn parse_rating(text: &str) -> Option<f64> {
    RATING_VALUE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn parse_price(row: usize, text: &str) -> Result<f64, ScraperError> {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    let dollars = cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScraperError::Normalization {
            row,
            column: "Price",
            value: text.to_owned(),
            reason: "not a number".to_owned(),
        })?;
    Ok(round_one_decimal(dollars * EXCHANGE_RATE))
}

fn parse_colors(row: usize, text: &str) -> Result<i32, ScraperError> {
    let digits = DIGIT_RUN
        .find(text)
        .ok_or_else(|| ScraperError::Normalization {
            row,
            column: "Colors",
            value: text.to_owned(),
            reason: "no digits".to_owned(),
        })?;
    digits
        .as_str()
        .parse::<i32>()
        .map_err(|e| ScraperError::Normalization {
            row,
            column: "Colors",
            value: text.to_owned(),
            reason: e.to_string(),
        })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
