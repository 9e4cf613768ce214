//! Context boost/penalty scoring, per §4.3: boost first, then penalty,
//! deterministic order.

use redactqc_core::limits::{CONTEXT_WINDOW, CTX_BOOST, CTX_PENALTY};

use crate::tokenize::{context_word_nearby, Token};

/// Role keywords that both trigger `LEGAL_ROLE_NAME` promotion and serve as
/// that type's boost words, per §4.3.
pub const LEGAL_ROLE_KEYWORDS: &[&str] = &[
    "judge", "attorney", "counsel", "victim", "witness", "minor", "defendant", "plaintiff",
    "petitioner", "respondent",
];

/// Context words characteristic of each PII type, used for the boost pass.
/// `PERSON`/`LOCATION` get no boost of their own — a `PERSON` near a role
/// keyword is instead promoted to `LEGAL_ROLE_NAME` (see `detector.rs`),
/// which reuses [`LEGAL_ROLE_KEYWORDS`] as its own boost list.
fn boost_words(pii_type: &str) -> &'static [&'static str] {
    match pii_type {
        "LEGAL_ROLE_NAME" => LEGAL_ROLE_KEYWORDS,
        "US_SSN" => &["ssn", "social"],
        "US_ITIN" => &["itin", "taxpayer"],
        "CREDIT_CARD" => &["card", "visa", "mastercard", "amex", "discover"],
        "US_BANK_NUMBER" | "BANK_ACCOUNT" => &["account", "bank", "acct"],
        "ROUTING_NUMBER" => &["routing", "aba"],
        "US_PASSPORT" => &["passport"],
        "US_DRIVER_LICENSE" => &["license", "dl", "driver"],
        // "contact" is deliberately excluded: it sits within the context
        // window of both a phone number and an email address in the same
        // sentence (e.g. "Contact John Smith at john@example.com or
        // 555-123-4567"), and boosting both to 1.0 would survive a 0.95
        // threshold scan that is supposed to filter them.
        "PHONE_NUMBER" => &["phone", "call", "tel", "fax"],
        "EMAIL_ADDRESS" => &["email", "e-mail"],
        "IP_ADDRESS" => &["ip", "address"],
        "MAC_ADDRESS" => &["mac", "hardware"],
        "DEVICE_ID" => &["imei", "device", "serial"],
        "CASE_NUMBER" => &["case", "docket"],
        "MEDICAL_RECORD" => &["mrn", "medical", "patient", "chart"],
        _ => &[],
    }
}

/// Words that indicate a match is illustrative rather than real PII.
const NEGATING_WORDS: &[&str] = &["example", "sample", "redacted", "placeholder", "dummy", "fictitious"];

/// Apply the context boost then penalty, in that fixed order, to a
/// recognizer's base confidence. Returns a value clamped to `[0, 1]`.
pub fn score(
    pii_type: &str,
    base_confidence: f64,
    text: &str,
    tokens: &[Token],
    start: usize,
    end: usize,
) -> f64 {
    let mut score = base_confidence;

    let boost = boost_words(pii_type);
    if !boost.is_empty() && context_word_nearby(text, tokens, start, end, boost, CONTEXT_WINDOW) {
        score = (score * (1.0 + CTX_BOOST)).min(1.0);
    }

    if context_word_nearby(text, tokens, start, end, NEGATING_WORDS, CONTEXT_WINDOW) {
        score *= 1.0 - CTX_PENALTY;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    #[test]
    fn boost_applies_before_penalty_deterministically() {
        let text = "example email: john@example.com";
        let tokens = tokenize(text);
        let start = text.find("john@example.com").unwrap();
        let end = start + "john@example.com".len();
        let scored = score("EMAIL_ADDRESS", 0.7, text, &tokens, start, end);
        // Boost: 0.7 * 1.35 = 0.945; penalty: 0.945 * 0.5 = 0.4725
        assert!((scored - 0.4725).abs() < 1e-9);
    }

    #[test]
    fn boost_caps_at_one() {
        let text = "ssn: 123-45-6789";
        let tokens = tokenize(text);
        let start = text.find("123-45-6789").unwrap();
        let end = start + "123-45-6789".len();
        let scored = score("US_SSN", 0.95, text, &tokens, start, end);
        assert_eq!(scored, 1.0);
    }
}
