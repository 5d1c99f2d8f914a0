use chrono::NaiveDate;
use fstudio_core::FetchedAt;

use super::*;

fn captured() -> FetchedAt {
    FetchedAt::Captured(
        NaiveDate::from_ymd_opt(2025, 5, 10)
            .unwrap()
            .and_hms_micro_opt(10, 15, 30, 120_000)
            .unwrap(),
    )
}

fn make_raw(rating: &str, price: &str, colors: &str) -> RawProductRecord {
    RawProductRecord {
        title: "T-shirt 1".to_string(),
        price: price.to_string(),
        rating: rating.to_string(),
        colors: colors.to_string(),
        size: "M".to_string(),
        gender: "Men".to_string(),
        fetched_at: captured(),
    }
}

/// Rebuilds the raw text shape of a normalized row, as if it had been
/// scraped again.
fn to_raw_shape(row: &NormalizedProductRecord) -> RawProductRecord {
    RawProductRecord {
        title: row.title.clone(),
        price: format!("${}", row.price / EXCHANGE_RATE),
        rating: row
            .rating
            .map_or_else(|| "Not Rated".to_string(), |r| format!("⭐ {r:?}")),
        colors: format!("{} Colors", row.colors),
        size: row.size.clone(),
        gender: row.gender.clone(),
        fetched_at: FetchedAt::Text(row.timestamp.clone().unwrap_or_default()),
    }
}

// ---------------------------------------------------------------------------
// Worked scenarios
// ---------------------------------------------------------------------------

#[test]
fn converts_rating_price_and_colors() {
    let out = normalize(
        &[make_raw("⭐ 4.5", "$10.00", "3 Colors")],
        CoercionPolicy::AbortBatch,
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rating, Some(4.5));
    assert!((out[0].price - 160_000.0).abs() < f64::EPSILON);
    assert_eq!(out[0].colors, 3);
    assert_eq!(out[0].size, "M");
    assert_eq!(out[0].gender, "Men");
}

#[test]
fn invalid_rating_row_is_excluded() {
    let out = normalize(
        &[
            make_raw("⭐ 4.5", "$10.00", "3 Colors"),
            make_raw(INVALID_RATING, "$12.00", "2 Colors"),
        ],
        CoercionPolicy::AbortBatch,
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rating, Some(4.5));
}

#[test]
fn non_numeric_price_empties_the_batch() {
    let out = normalize(
        &[
            make_raw("⭐ 4.5", "$10.00", "3 Colors"),
            make_raw("⭐ 3.0", "INVALID", "2 Colors"),
        ],
        CoercionPolicy::AbortBatch,
    );
    assert!(out.is_empty());
}

#[test]
fn colors_without_digits_empties_the_batch() {
    let out = normalize(
        &[
            make_raw("⭐ 4.5", "$10.00", "3 Colors"),
            make_raw("⭐ 3.0", "$9.00", "No Colors"),
        ],
        CoercionPolicy::AbortBatch,
    );
    assert!(out.is_empty());
}

#[test]
fn drop_row_policy_keeps_the_good_rows() {
    let out = normalize(
        &[
            make_raw("⭐ 4.5", "$10.00", "3 Colors"),
            make_raw("⭐ 3.0", "INVALID", "2 Colors"),
            make_raw("⭐ 2.5", "$1,250.00", "1 Colors"),
        ],
        CoercionPolicy::DropRow,
    );
    assert_eq!(out.len(), 2);
    assert!((out[1].price - 20_000_000.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Column coercions
// ---------------------------------------------------------------------------

#[test]
fn price_is_rounded_to_one_decimal() {
    let row = normalize_record(0, &make_raw("⭐ 4.0", "$0.123456", "1 Colors")).unwrap();
    assert!((row.price - 1975.3).abs() < 1e-9, "got {}", row.price);
}

#[test]
fn price_with_thousands_separator_parses() {
    let row = normalize_record(0, &make_raw("⭐ 4.0", "$1,000.50", "1 Colors")).unwrap();
    assert!((row.price - 16_008_000.0).abs() < f64::EPSILON);
}

#[test]
fn price_placeholder_is_a_coercion_failure() {
    let err = normalize_record(4, &make_raw("⭐ 4.0", "Price Not Available", "1 Colors"))
        .unwrap_err();
    assert!(matches!(
        err,
        ScraperError::Normalization { row: 4, column: "Price", .. }
    ));
}

#[test]
fn nan_price_is_rejected() {
    let result = normalize_record(0, &make_raw("⭐ 4.0", "NaN", "1 Colors"));
    assert!(result.is_err());
}

#[test]
fn rating_without_decimal_point_is_missing() {
    let row = normalize_record(0, &make_raw("⭐ 4", "$1.00", "1 Colors")).unwrap();
    assert_eq!(row.rating, None);
}

#[test]
fn rating_with_extra_text_extracts_value() {
    let row = normalize_record(0, &make_raw("Rating: ⭐ 3.9 / 5", "$1.00", "1 Colors")).unwrap();
    assert_eq!(row.rating, Some(3.9));
}

#[test]
fn colors_uses_first_digit_run() {
    let row = normalize_record(0, &make_raw("⭐ 4.0", "$1.00", "12 Colors (3 new)")).unwrap();
    assert_eq!(row.colors, 12);
}

#[test]
fn colors_overflow_is_a_coercion_failure() {
    let err = normalize_record(0, &make_raw("⭐ 4.0", "$1.00", "99999999999 Colors")).unwrap_err();
    assert!(matches!(
        err,
        ScraperError::Normalization { column: "Colors", .. }
    ));
}

#[test]
fn timestamp_is_iso_with_microseconds() {
    let row = normalize_record(0, &make_raw("⭐ 4.0", "$1.00", "1 Colors")).unwrap();
    assert_eq!(row.timestamp.as_deref(), Some("2025-05-10T10:15:30.120000"));
}

#[test]
fn unparsable_timestamp_becomes_null_without_dropping_row() {
    let mut raw = make_raw("⭐ 4.0", "$1.00", "1 Colors");
    raw.fetched_at = FetchedAt::Text("not a time".to_string());
    let out = normalize(&[raw], CoercionPolicy::AbortBatch);
    assert_eq!(out.len(), 1);
    assert!(out[0].timestamp.is_none());
}

// ---------------------------------------------------------------------------
// Laws
// ---------------------------------------------------------------------------

#[test]
fn output_never_exceeds_input() {
    let input = vec![
        make_raw("⭐ 4.5", "$10.00", "3 Colors"),
        make_raw(INVALID_RATING, "$10.00", "3 Colors"),
        make_raw("⭐ 1.5", "$7.25", "6 Colors"),
    ];
    let out = normalize(&input, CoercionPolicy::AbortBatch);
    assert_eq!(out.len(), 2);
    assert!(out.len() <= input.len());
}

#[test]
fn clean_input_keeps_every_row() {
    let input = vec![
        make_raw("⭐ 4.5", "$10.00", "3 Colors"),
        make_raw("⭐ 1.5", "$7.25", "6 Colors"),
    ];
    assert_eq!(normalize(&input, CoercionPolicy::AbortBatch).len(), input.len());
}

#[test]
fn renormalizing_raw_shape_applies_price_factor_once() {
    let input = vec![
        make_raw("⭐ 4.5", "$10.00", "3 Colors"),
        make_raw("⭐ 3.9", "$102.15", "5 Colors"),
        make_raw("⭐ 4", "$499.99", "1 Colors"),
    ];
    let first = normalize(&input, CoercionPolicy::AbortBatch);
    let round_trip: Vec<RawProductRecord> = first.iter().map(to_raw_shape).collect();
    let second = normalize(&round_trip, CoercionPolicy::AbortBatch);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert!((a.price - b.price).abs() < 1e-6, "{} vs {}", a.price, b.price);
        assert_eq!(a.rating, b.rating);
        assert_eq!(a.colors, b.colors);
        assert_eq!(a.timestamp, b.timestamp);
    }
}

#[test]
fn empty_input_gives_empty_output() {
    assert!(normalize(&[], CoercionPolicy::AbortBatch).is_empty());
}
