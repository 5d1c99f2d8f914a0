//! Product record types for the two pipeline stages.
//!
//! [`RawProductRecord`] is what the extractor produces: every field is text,
//! and missing values are rendered as fixed placeholder strings. The
//! normalizer filters on those placeholders, so their exact spelling is part
//! of the contract.
//!
//! [`NormalizedProductRecord`] is the typed row handed to the sinks. Its serde
//! field names are the column headers written to every destination.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const PRICE_NOT_AVAILABLE: &str = "Price Not Available";
pub const INVALID_RATING: &str = "Invalid Rating";
pub const NO_COLORS: &str = "No Colors";
/// Placeholder shared by `size` and `gender`.
pub const UNKNOWN: &str = "Unknown";

/// Column order used by every sink.
pub const COLUMNS: [&str; 7] = [
    "Title",
    "Price",
    "Rating",
    "Colors",
    "Size",
    "Gender",
    "Timestamp",
];

/// Capture time of a raw record.
///
/// Records produced by the extractor always carry `Captured`. `Text` exists so
/// tables built from other sources (a re-imported CSV, a hand-written fixture)
/// can be fed through the normalizer, which is where unparsable timestamps are
/// turned into nulls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedAt {
    Captured(NaiveDateTime),
    Text(String),
}

impl FetchedAt {
    /// Resolves the capture time, parsing `Text` values leniently.
    ///
    /// Accepts RFC 3339 (offset dropped after conversion to the stated local
    /// time), `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]` and a bare
    /// `YYYY-MM-DD` (midnight). Returns `None` for anything else.
    #[must_use]
    pub fn resolve(&self) -> Option<NaiveDateTime> {
        match self {
            FetchedAt::Captured(ts) => Some(*ts),
            FetchedAt::Text(raw) => parse_timestamp_text(raw.trim()),
        }
    }
}

fn parse_timestamp_text(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// One scraped product card. Every field is always populated, either with
/// the scraped text or with its placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProductRecord {
    pub title: String,
    /// Currency text as shown on the card, e.g. `"$25.00"`.
    pub price: String,
    /// Star glyph plus decimal, e.g. `"⭐ 4.8"`.
    pub rating: String,
    /// Colour-variant count as text, e.g. `"3"`.
    pub colors: String,
    pub size: String,
    pub gender: String,
    pub fetched_at: FetchedAt,
}

/// A validated, typed product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProductRecord {
    #[serde(rename = "Title")]
    pub title: String,
    /// Price in rupiah: source dollars × 16000, rounded to one decimal.
    #[serde(rename = "Price")]
    pub price: f64,
    /// `None` when the rating text carried no `⭐ N.N` value.
    #[serde(rename = "Rating")]
    pub rating: Option<f64>,
    #[serde(rename = "Colors")]
    pub colors: i32,
    #[serde(rename = "Size")]
    pub size: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    /// ISO-8601 with microseconds; `None` when the capture time was unparsable.
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
}
