//! Field extraction from a single product card.
//!
//! Title and price come from dedicated elements. Rating, colour count, size
//! and gender live in free-form `<p>` fragments, so each is found by scanning
//! for the first fragment that mentions its keyword and applying the field
//! pattern to that fragment alone. A `<p>` only counts as a fragment when it
//! holds a single string; paragraphs with mixed markup are skipped.

use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use scraper::{ElementRef, Node, Selector};

use fstudio_core::{
    FetchedAt, RawProductRecord, INVALID_RATING, NO_COLORS, PRICE_NOT_AVAILABLE, UNKNOWN,
    UNKNOWN_TITLE,
};

use crate::error::ScraperError;

const CARD_SELECTOR: &str = "div.collection-card";
const TITLE_SELECTOR: &str = ".product-details h3.product-title";
const PRICE_SELECTOR: &str = "div.price-container";
const FRAGMENT_SELECTOR: &str = "p";

static RATING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rating:\s*(⭐\s*\d+(?:\.\d+)?)").expect("valid regex"));
static COLORS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*Colors").expect("valid regex"));
static SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Size:\s*(\w+)").expect("valid regex"));
static GENDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Gender:\s*(\w+)").expect("valid regex"));

/// Compiled selectors for the listing markup.
#[derive(Debug)]
pub struct CardSelectors {
    pub(crate) card: Selector,
    title: Selector,
    price: Selector,
    fragment: Selector,
}

impl CardSelectors {
    /// Compiles every selector used to read a listing page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Selector`] if a selector fails to parse.
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            card: compile(CARD_SELECTOR)?,
            title: compile(TITLE_SELECTOR)?,
            price: compile(PRICE_SELECTOR)?,
            fragment: compile(FRAGMENT_SELECTOR)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::Selector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

/// Fields read from one card. `None` means the value was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub colors: Option<String>,
    pub size: Option<String>,
    pub gender: Option<String>,
}

impl ExtractedFields {
    /// Renders missing fields as their placeholders and stamps the record.
    #[must_use]
    pub fn into_record(self, fetched_at: NaiveDateTime) -> RawProductRecord {
        RawProductRecord {
            title: self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_owned()),
            price: self.price.unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_owned()),
            rating: self.rating.unwrap_or_else(|| INVALID_RATING.to_owned()),
            colors: self.colors.unwrap_or_else(|| NO_COLORS.to_owned()),
            size: self.size.unwrap_or_else(|| UNKNOWN.to_owned()),
            gender: self.gender.unwrap_or_else(|| UNKNOWN.to_owned()),
            fetched_at: FetchedAt::Captured(fetched_at),
        }
    }
}

/// Reads every field from a product card.
#[must_use]
pub fn extract_fields(card: ElementRef<'_>, selectors: &CardSelectors) -> ExtractedFields {
    let title = card
        .select(&selectors.title)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    let price = card.select(&selectors.price).next().map(element_text);

    let fragments: Vec<String> = card
        .select(&selectors.fragment)
        .filter_map(sole_string)
        .collect();

    ExtractedFields {
        title,
        price,
        rating: first_match(&fragments, "Rating", &RATING_PATTERN),
        colors: first_match(&fragments, "Colors", &COLORS_PATTERN),
        size: first_match(&fragments, "Size", &SIZE_PATTERN),
        gender: first_match(&fragments, "Gender", &GENDER_PATTERN),
    }
}

/// Extracts a card into a [`RawProductRecord`] stamped with the current local time.
#[must_use]
pub fn extract(card: ElementRef<'_>, selectors: &CardSelectors) -> RawProductRecord {
    extract_fields(card, selectors).into_record(Local::now().naive_local())
}

/// Applies `pattern` to the first fragment containing `keyword` and returns
/// the trimmed first capture group.
///
/// Later fragments are never consulted, even when the pattern fails on the
/// first keyword fragment.
#[must_use]
pub fn first_match(fragments: &[String], keyword: &str, pattern: &Regex) -> Option<String> {
    let fragment = fragments.iter().find(|f| f.contains(keyword))?;
    pattern
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
}

/// [`first_match`] with `default` substituted when nothing matched.
#[must_use]
pub fn first_match_or_default(
    fragments: &[String],
    keyword: &str,
    pattern: &Regex,
    default: &str,
) -> String {
    first_match(fragments, keyword, pattern).unwrap_or_else(|| default.to_owned())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

/// Text of an element whose only child is a text node, descending through
/// single-child wrappers such as `<p><span>..</span></p>`.
fn sole_string(el: ElementRef<'_>) -> Option<String> {
    let mut children = el.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    match only.value() {
        Node::Text(text) => Some(text.trim().to_owned()),
        Node::Element(_) => ElementRef::wrap(only).and_then(sole_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use scraper::Html;

    use super::*;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn extract_first_card(html: &str) -> ExtractedFields {
        let selectors = CardSelectors::new().unwrap();
        let document = Html::parse_document(html);
        let card = document
            .select(&selectors.card)
            .next()
            .expect("fixture has a card");
        extract_fields(card, &selectors)
    }

    fn fragments(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn extracts_complete_card() {
        let fields = extract_first_card(
            r#"<div class="collection-card">
                 <div class="product-details">
                   <h3 class="product-title">  T-shirt 2 </h3>
                   <div class="price-container"><span class="price">$102.15</span></div>
                   <p>Rating: ⭐ 3.9 / 5</p>
                   <p>3 Colors</p>
                   <p>Size: M</p>
                   <p>Gender: Women</p>
                 </div>
               </div>"#,
        );
        assert_eq!(fields.title.as_deref(), Some("T-shirt 2"));
        assert_eq!(fields.price.as_deref(), Some("$102.15"));
        assert_eq!(fields.rating.as_deref(), Some("⭐ 3.9"));
        assert_eq!(fields.colors.as_deref(), Some("3"));
        assert_eq!(fields.size.as_deref(), Some("M"));
        assert_eq!(fields.gender.as_deref(), Some("Women"));
    }

    #[test]
    fn card_without_optional_fields_gets_every_placeholder() {
        let fields =
            extract_first_card(r#"<div class="collection-card"><div class="product-details"></div></div>"#);
        assert_eq!(fields, ExtractedFields::default());

        let record = fields.into_record(fixed_time());
        assert_eq!(record.title, UNKNOWN_TITLE);
        assert_eq!(record.price, PRICE_NOT_AVAILABLE);
        assert_eq!(record.rating, INVALID_RATING);
        assert_eq!(record.colors, NO_COLORS);
        assert_eq!(record.size, UNKNOWN);
        assert_eq!(record.gender, UNKNOWN);
        assert_eq!(record.fetched_at, FetchedAt::Captured(fixed_time()));
    }

    #[test]
    fn blank_title_becomes_placeholder() {
        let fields = extract_first_card(
            r#"<div class="collection-card"><div class="product-details">
                 <h3 class="product-title">   </h3>
               </div></div>"#,
        );
        assert!(fields.title.is_none());
        assert_eq!(fields.into_record(fixed_time()).title, UNKNOWN_TITLE);
    }

    #[test]
    fn title_outside_product_details_is_ignored() {
        let fields = extract_first_card(
            r#"<div class="collection-card"><h3 class="product-title">Loose</h3></div>"#,
        );
        assert!(fields.title.is_none());
    }

    #[test]
    fn invalid_rating_text_yields_placeholder() {
        let fields = extract_first_card(
            r#"<div class="collection-card"><div class="product-details">
                 <p>Rating: ⭐ Invalid Rating / 5</p>
               </div></div>"#,
        );
        assert!(fields.rating.is_none());
        assert_eq!(fields.into_record(fixed_time()).rating, INVALID_RATING);
    }

    #[test]
    fn rating_without_decimal_still_matches() {
        let frags = fragments(&["Rating: ⭐4 / 5"]);
        assert_eq!(
            first_match(&frags, "Rating", &RATING_PATTERN).as_deref(),
            Some("⭐4")
        );
    }

    #[test]
    fn scan_stops_at_first_keyword_fragment() {
        // The first "Size" fragment has no match, so the later valid one is never used.
        let frags = fragments(&["Size chart below", "Size: XL"]);
        assert_eq!(
            first_match_or_default(&frags, "Size", &SIZE_PATTERN, UNKNOWN),
            UNKNOWN
        );
    }

    #[test]
    fn paragraph_with_mixed_markup_is_skipped() {
        let fields = extract_first_card(
            r#"<div class="collection-card"><div class="product-details">
                 <p>Size: <b>XL</b></p>
                 <p>Size: S</p>
                 <p><span>Gender: Men</span></p>
               </div></div>"#,
        );
        assert_eq!(fields.size.as_deref(), Some("S"));
        assert_eq!(fields.gender.as_deref(), Some("Men"));
    }

    #[test]
    fn keyword_absent_everywhere_yields_default() {
        let frags = fragments(&["Rating: ⭐ 4.0 / 5", "Size: S"]);
        assert_eq!(
            first_match_or_default(&frags, "Gender", &GENDER_PATTERN, UNKNOWN),
            UNKNOWN
        );
    }

    #[test]
    fn colors_capture_is_the_digit_run() {
        let frags = fragments(&["Rating: ⭐ 4.0 / 5", "  8   Colors "]);
        assert_eq!(
            first_match(&frags, "Colors", &COLORS_PATTERN).as_deref(),
            Some("8")
        );
    }

    #[test]
    fn extract_stamps_current_time() {
        let selectors = CardSelectors::new().unwrap();
        let document = Html::parse_document(r#"<div class="collection-card"></div>"#);
        let card = document.select(&selectors.card).next().unwrap();
        let before = Local::now().naive_local();
        let record = extract(card, &selectors);
        let after = Local::now().naive_local();
        match record.fetched_at {
            FetchedAt::Captured(ts) => assert!(ts >= before && ts <= after),
            FetchedAt::Text(other) => panic!("expected captured time, got {other}"),
        }
    }
}
