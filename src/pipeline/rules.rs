//! Ordered pattern-rule tables for Aadhaar field extraction.
//!
//! Each field owns an explicit ordered list of [`FieldRule`]s; extraction
//! walks the list and the first rule that captures wins. Keeping the rules
//! as data makes the precedence testable independently of the regex engine,
//! and new card layouts become new list entries rather than nested branches.
//!
//! Labels appear on Aadhaar cards in two scripts (English and Hindi), so
//! every label alternation carries both.

use std::sync::LazyLock;

use regex::Regex;

/// A compiled pattern with a label for diagnostics.
pub struct FieldRule {
    pub label: &'static str,
    regex: Regex,
}

impl FieldRule {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            regex: Regex::new(pattern).expect("Invalid field extraction pattern"),
        }
    }

    /// First capture group of the first match, trimmed. Empty captures are
    /// treated as misses.
    pub fn capture(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Walk a rule list in order; the first rule that captures wins.
pub fn first_capture(rules: &[FieldRule], text: &str) -> Option<String> {
    rules.iter().find_map(|rule| {
        let captured = rule.capture(text);
        if captured.is_some() {
            tracing::trace!(rule = rule.label, "Field rule matched");
        }
        captured
    })
}

/// 12-digit identity number, optionally grouped 4-4-4 with single spaces.
pub static ID_NUMBER_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![FieldRule::new(
        "id-grouped-4-4-4",
        r"\b(\d{4}\s?\d{4}\s?\d{4})\b",
    )]
});

/// Date of birth as DD/MM/YYYY or DD-MM-YYYY. No calendar validation:
/// out-of-range day/month values still match.
pub static DATE_OF_BIRTH_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![FieldRule::new(
        "dob-numeric",
        r"\b(\d{2}[/-]\d{2}[/-]\d{4})\b",
    )]
});

/// Gender tokens, whole-word, longest variants first so the bare letters
/// only win when nothing fuller is present at the same position.
pub static GENDER_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![FieldRule::new(
        "gender-word",
        r"\b(Male|Female|MALE|FEMALE|M|F)\b",
    )]
});

/// Holder name: an uppercase run directly before a relationship marker,
/// optionally anchored at a name label, the text start, or the issuing
/// header.
pub static NAME_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule::new(
            "name-after-label",
            r"(?:Name|NAME|नाम)[\s:]*([A-Z][A-Z\s]{10,40}?)\s+(?:S/O|D/O|W/O|C/O|Son|Daughter)",
        ),
        FieldRule::new(
            "name-at-start",
            r"^([A-Z][A-Z\s]{10,40}?)\s+(?:S/O|D/O|W/O|C/O)",
        ),
        FieldRule::new(
            "name-after-issuer-header",
            r"(?:Government of India|भारत सरकार)[\s\S]{0,200}?([A-Z][A-Z\s]{10,40}?)\s+(?:S/O|D/O)",
        ),
    ]
});

/// Fallback: a line that is nothing but uppercase letters and spaces, used
/// only when every [`NAME_RULES`] entry misses.
pub static NAME_FALLBACK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s]{5,40}$").expect("Invalid fallback name pattern"));

/// Father's/guardian's name: after a relationship marker or a father label.
pub static FATHER_NAME_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule::new(
            "father-after-marker",
            r"(?:S/O|D/O|W/O|C/O|Son of|Daughter of)[\s:]*([A-Z][A-Z\s]{10,40}?)(?:\s|$|,|Date|DOB)",
        ),
        FieldRule::new(
            "father-after-label",
            r"(?:Father|FATHER|पिता)[\s:]*([A-Z][A-Z\s]{10,40}?)(?:\s|$|,)",
        ),
    ]
});

/// Address: after an address label, ending at a 6-digit PIN code or a PIN
/// marker, else at end of line/text. Runs against the original text so the
/// newline terminator stays meaningful.
pub static ADDRESS_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule::new(
            "address-to-pin",
            r"(?:Address|ADDRESS|पता)[\s:]*([A-Z0-9\s,]{20,200}?)(?:\d{6}|PIN|Pin)",
        ),
        FieldRule::new(
            "address-to-line-end",
            r"(?:Address|ADDRESS)[\s:]*([A-Z0-9\s,]{20,200}?)(?:\n|$)",
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_capture_trims_and_rejects_empty() {
        let rule = FieldRule::new("test", r"value:(\s*[A-Z]*)");
        assert_eq!(rule.capture("value: ABC"), Some("ABC".into()));
        assert_eq!(rule.capture("value:   "), None);
        assert_eq!(rule.capture("nothing here"), None);
    }

    #[test]
    fn first_capture_respects_list_order() {
        let rules = vec![
            FieldRule::new("first", r"a(1)"),
            FieldRule::new("second", r"(2)"),
        ];
        // Both rules would match; the first in list order wins
        assert_eq!(first_capture(&rules, "a1 2"), Some("1".into()));
        // First rule misses, second picks up
        assert_eq!(first_capture(&rules, "2 only"), Some("2".into()));
        assert_eq!(first_capture(&rules, "none"), None);
    }

    #[test]
    fn id_rule_accepts_grouped_and_ungrouped_digits() {
        let rules = &*ID_NUMBER_RULES;
        assert_eq!(first_capture(rules, "1234 5678 9012"), Some("1234 5678 9012".into()));
        assert_eq!(first_capture(rules, "123456789012"), Some("123456789012".into()));
        // 13-digit runs never match — digits on both sides kill the word boundary
        assert_eq!(first_capture(rules, "1234567890123"), None);
    }

    #[test]
    fn gender_rule_prefers_full_words_and_binds_whole_words() {
        let rules = &*GENDER_RULES;
        assert_eq!(first_capture(rules, "Gender: Male"), Some("Male".into()));
        assert_eq!(first_capture(rules, "FEMALE"), Some("FEMALE".into()));
        assert_eq!(first_capture(rules, "Sex M DOB"), Some("M".into()));
        // Embedded letters do not match
        assert_eq!(first_capture(rules, "FORM AMOUNT"), None);
        // Lowercase variants are not listed and do not match
        assert_eq!(first_capture(rules, "male female"), None);
    }

    #[test]
    fn name_rules_match_in_declared_order() {
        // Label-anchored rule
        assert_eq!(
            first_capture(&NAME_RULES, "Name: RAJESH KUMAR SHARMA S/O SURESH"),
            Some("RAJESH KUMAR SHARMA".into())
        );
        // Start-anchored rule
        assert_eq!(
            first_capture(&NAME_RULES, "RAJESH KUMAR SHARMA S/O SURESH"),
            Some("RAJESH KUMAR SHARMA".into())
        );
        // Issuer-header rule
        assert_eq!(
            first_capture(
                &NAME_RULES,
                "Government of India Unique Identification PRIYA DEVI SHARMA D/O RAM"
            ),
            Some("PRIYA DEVI SHARMA".into())
        );
    }

    #[test]
    fn father_rule_stops_at_first_break_after_minimum_length() {
        assert_eq!(
            first_capture(&FATHER_NAME_RULES, "S/O SURESH KUMAR"),
            Some("SURESH KUMAR".into())
        );
        assert_eq!(
            first_capture(&FATHER_NAME_RULES, "पिता: MOHAN LAL VERMA,"),
            Some("MOHAN LAL VERMA".into())
        );
    }

    #[test]
    fn address_rule_stops_at_pin_code() {
        let text = "Address: HOUSE 12, SECTOR 4, GURGAON HARYANA 122001";
        let captured = first_capture(&ADDRESS_RULES, text).unwrap();
        assert!(captured.starts_with("HOUSE 12"));
        assert!(!captured.contains("122001"));
    }
}
