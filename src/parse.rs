//! Input classification for the dialogue.
//!
//! Each function takes raw user text and returns the parsed value, or `None`
//! when the text is not acceptable for that prompt. None of these fail hard.

use crate::catalog::Occasion;
use crate::state_machine::Recipient;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_OCCASION_LEN: usize = 60;
pub const MAX_MESSAGE_LEN: usize = 200;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,15}$").expect("phone pattern"));

static ORDER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:₹|rs\.?|inr)?\s*(\d[\d,]*)\s*(?:[x×*]\s*|\s+)(\d+)$")
        .expect("order line pattern")
});

static PO_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9/-]{3,30}$").expect("po number pattern"));

static RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([1-5])(?:\s*/\s*5|\s*stars?)?$").expect("rating pattern")
});

/// Lowercase, trim and drop trailing punctuation so `Hi!` matches `hi`
pub fn normalize_keyword(text: &str) -> String {
    text.trim()
        .trim_end_matches(['!', '.', '?', ','])
        .trim()
        .to_lowercase()
}

/// `text` without a leading `prefix`, compared ignoring ASCII case
pub fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

pub fn is_greeting(text: &str) -> bool {
    matches!(normalize_keyword(text).as_str(), "hi" | "hello" | "hey")
}

/// Strip everything but digits and parse; zero and empty are rejected.
pub fn parse_amount(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok().filter(|amount| *amount > 0)
}

pub fn is_valid_email(text: &str) -> bool {
    EMAIL.is_match(text.trim())
}

/// Normalized phone number (whitespace and hyphens removed)
pub fn normalize_phone(text: &str) -> Option<String> {
    let compact: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    PHONE.is_match(&compact).then_some(compact)
}

/// Email first, then phone
pub fn parse_recipient(text: &str) -> Option<Recipient> {
    let trimmed = text.trim();
    if is_valid_email(trimmed) {
        return Some(Recipient::Email(trimmed.to_lowercase()));
    }
    normalize_phone(trimmed).map(Recipient::Phone)
}

/// `now` / `today` or a strict `YYYY-MM-DD` calendar date
pub fn parse_delivery_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("now") || text.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    // chrono accepts unpadded fields, the prompt promises exactly 10 chars
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// What the user picked at the occasion prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccasionInput {
    Known(Occasion),
    /// Explicit "other": ask for the custom text next
    Other,
    Custom(String),
    Invalid,
}

pub fn parse_occasion(text: &str) -> OccasionInput {
    let trimmed = text.trim();
    let key = strip_prefix_ignore_case(trimmed, "occasion:")
        .unwrap_or(trimmed)
        .trim();

    if let Some(occasion) = Occasion::from_keyword(key) {
        return OccasionInput::Known(occasion);
    }
    if key.eq_ignore_ascii_case("other") {
        return OccasionInput::Other;
    }
    parse_custom_occasion(key).map_or(OccasionInput::Invalid, OccasionInput::Custom)
}

pub fn parse_custom_occasion(text: &str) -> Option<String> {
    let text = text.trim();
    let len = text.chars().count();
    (1..=MAX_OCCASION_LEN).contains(&len).then(|| text.to_string())
}

/// Personal message; `Some(None)` means the user skipped it
pub fn parse_message(text: &str) -> Option<Option<String>> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("skip") {
        return Some(None);
    }
    (text.chars().count() <= MAX_MESSAGE_LEN).then(|| Some(text.to_string()))
}

/// Uppercased tax id with whitespace removed
pub fn normalize_tax_id(text: &str) -> Option<String> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    (!compact.is_empty()).then_some(compact)
}

/// Mock eligibility check: four or more `0` digits fails verification.
///
/// Placeholder rule kept for parity with the prototype flow; it is not a
/// real tax-id validation.
pub fn passes_mock_verification(tax_id: &str) -> bool {
    tax_id.chars().filter(|c| *c == '0').count() < 4
}

/// `500 x 20`, `500*20` or `500 20` as (denomination, quantity)
pub fn parse_order_line(text: &str) -> Option<(u64, u64)> {
    let caps = ORDER_LINE.captures(text.trim())?;
    let denomination = parse_amount(caps.get(1)?.as_str())?;
    let quantity = caps.get(2)?.as_str().parse::<u64>().ok()?;
    Some((denomination, quantity))
}

pub fn parse_po_number(text: &str) -> Option<String> {
    let text = text.trim();
    PO_NUMBER.is_match(text).then(|| text.to_uppercase())
}

pub fn parse_rating(text: &str) -> Option<u8> {
    let caps = RATING.captures(text.trim())?;
    caps.get(1)?.as_str().parse().ok()
}
