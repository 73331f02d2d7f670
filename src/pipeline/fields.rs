//! Field extraction — noisy OCR text in, structured record out.
//!
//! Pure and deterministic: the same text always yields the same record, and
//! every field is evaluated independently against the rule tables in
//! [`super::rules`]. A field with no match stays an empty string.
//!
//! Most rules run against a whitespace-collapsed copy of the text because
//! OCR line breaks fall in arbitrary places. The name fallback scan and the
//! address rules are the exception: they need the original line structure.

use super::rules::{
    first_capture, ADDRESS_RULES, DATE_OF_BIRTH_RULES, FATHER_NAME_RULES, GENDER_RULES,
    ID_NUMBER_RULES, NAME_FALLBACK_LINE, NAME_RULES,
};
use super::types::ExtractionRecord;

/// Issuer-header fragments that disqualify a line in the name fallback scan.
const EXCLUDED_LINE_FRAGMENTS: [&str; 2] = ["GOVERNMENT", "INDIA"];

/// How many qualifying lines the name fallback scan examines.
const FALLBACK_SCAN_LINES: usize = 5;

/// Parse structured Aadhaar fields out of recognized text.
pub fn extract(text: &str) -> ExtractionRecord {
    if text.trim().is_empty() {
        return ExtractionRecord::default();
    }

    let flat = collapse_whitespace(text);

    let mut record = ExtractionRecord {
        id_number: first_capture(&ID_NUMBER_RULES, &flat)
            .map(|raw| normalize_id_number(&raw))
            .unwrap_or_default(),
        date_of_birth: first_capture(&DATE_OF_BIRTH_RULES, &flat).unwrap_or_default(),
        gender: first_capture(&GENDER_RULES, &flat).unwrap_or_default(),
        name: first_capture(&NAME_RULES, &flat).unwrap_or_default(),
        father_name: first_capture(&FATHER_NAME_RULES, &flat).unwrap_or_default(),
        address: first_capture(&ADDRESS_RULES, text).unwrap_or_default(),
    };

    // The fallback scan runs only when every primary name rule missed.
    if record.name.is_empty() {
        record.name = fallback_name(text).unwrap_or_default();
    }

    record
}

/// Collapse every whitespace run (including newlines) to a single space and
/// trim the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Re-group a captured 12-digit number into canonical `dddd dddd dddd`
/// form, whatever spacing the OCR produced.
fn normalize_id_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    debug_assert_eq!(digits.len(), 12);
    format!("{} {} {}", &digits[0..4], &digits[4..8], &digits[8..12])
}

/// Scan the first few substantial lines for one that looks like a printed
/// name: entirely uppercase letters and spaces, not an issuer header.
fn fallback_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 5)
        .take(FALLBACK_SCAN_LINES)
        .find(|line| {
            NAME_FALLBACK_LINE.is_match(line)
                && !EXCLUDED_LINE_FRAGMENTS
                    .iter()
                    .any(|fragment| line.contains(fragment))
        })
        .map(str::to_string)
}
