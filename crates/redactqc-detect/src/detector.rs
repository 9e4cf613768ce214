//! C3 Detector: the top-level entry point tying recognizers, context
//! scoring, the `LEGAL_ROLE_NAME` promotion, the confidence filter, and
//! overlap dedup together. §4.3 in full.

use std::panic::{self, AssertUnwindSafe};

use redactqc_core::limits::CONTEXT_WINDOW;

use crate::dedup;
use crate::recognizers::{self};
use crate::scoring::{self, LEGAL_ROLE_KEYWORDS};
use crate::snippet;
use crate::tokenize::{self, context_word_nearby};
use crate::types::{DetectedFinding, Recognizer, SpanMatch};

/// Holds the fixed recognizer registry built once at worker startup, so its
/// cost (compiling every pattern) is amortised across every document the
/// worker processes — the same rationale §4.5 gives for why each worker
/// builds its own `Detector`.
pub struct Detector {
    registry: Vec<Box<dyn Recognizer>>,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    pub fn new() -> Self {
        Self {
            registry: recognizers::build_registry(),
        }
    }

    /// Run every recognizer over one page's text, score, promote, filter,
    /// and deduplicate the results. Never fails: a recognizer that panics
    /// is caught, logged without its input, and skipped, per §4.3's "the
    /// detector never fails a document" contract.
    pub fn detect(&self, text: &str, min_confidence: f64) -> Vec<DetectedFinding> {
        if text.is_empty() {
            return Vec::new();
        }

        let tokens = tokenize::tokenize(text);
        let mut candidates: Vec<SpanMatch> = Vec::new();

        for recognizer in &self.registry {
            let name = recognizer.name();
            let result = panic::catch_unwind(AssertUnwindSafe(|| recognizer.analyze(text)));
            match result {
                Ok(matches) => candidates.extend(matches),
                Err(_) => {
                    tracing::warn!(recognizer = name, "recognizer panicked; skipping");
                }
            }
        }

        let mut findings: Vec<DetectedFinding> = candidates
            .into_iter()
            .filter(|m| !m.is_empty())
            .map(|m| self.score_and_promote(text, &tokens, m))
            .filter(|f| f.confidence >= min_confidence)
            .collect();

        findings = dedup::resolve(findings);
        findings.sort_by_key(|f| f.char_offset);
        findings
    }

    /// Score a candidate span, applying the `LEGAL_ROLE_NAME` promotion for
    /// `PERSON` spans near a legal-role keyword (§4.3's context-sensitive
    /// recognizer), and build its stored snippet.
    fn score_and_promote(&self, text: &str, tokens: &[tokenize::Token], m: SpanMatch) -> DetectedFinding {
        let pii_type = if m.pii_type == "PERSON"
            && context_word_nearby(text, tokens, m.start, m.end, LEGAL_ROLE_KEYWORDS, CONTEXT_WINDOW)
        {
            "LEGAL_ROLE_NAME"
        } else {
            m.pii_type
        };

        let confidence = scoring::score(pii_type, m.base_confidence, text, tokens, m.start, m.end);
        let context_snippet = snippet::build(text, m.start, m.len());

        DetectedFinding {
            pii_type: pii_type.to_string(),
            confidence,
            char_offset: m.start,
            char_length: m.len(),
            context_snippet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_text_scan_end_to_end() {
        let detector = Detector::new();
        let text = "Contact John Smith at john@example.com or 555-123-4567.";
        let findings = detector.detect(text, 0.4);

        let email = findings.iter().find(|f| f.pii_type == "EMAIL_ADDRESS");
        assert!(email.is_some());
        assert!(email.unwrap().confidence >= 0.85);

        let phone = findings.iter().find(|f| f.pii_type == "PHONE_NUMBER");
        assert!(phone.is_some());
        assert!(phone.unwrap().confidence >= 0.75);

        let person = findings
            .iter()
            .find(|f| f.pii_type == "PERSON" || f.pii_type == "LEGAL_ROLE_NAME");
        assert!(person.is_some());
        let person = person.unwrap();
        let surface = &text[person.char_offset..person.char_offset + person.char_length];
        assert_eq!(surface, "John Smith");
        assert!(person.confidence >= 0.85);
    }

    #[test]
    fn ssn_on_second_page_text() {
        let detector = Detector::new();
        let findings = detector.detect("SSN 123-45-6789", 0.4);
        let ssn = findings.iter().find(|f| f.pii_type == "US_SSN");
        assert!(ssn.is_some());
        assert!(ssn.unwrap().confidence >= 0.85);
    }

    #[test]
    fn threshold_filter_drops_lower_confidence_findings() {
        let detector = Detector::new();
        let text = "Contact John Smith at john@example.com or 555-123-4567.";
        let findings = detector.detect(text, 0.95);
        assert!(findings.iter().all(|f| f.pii_type != "PHONE_NUMBER"));
        assert!(findings.iter().all(|f| f.pii_type != "EMAIL_ADDRESS"));
    }

    #[test]
    fn witness_context_promotes_to_legal_role_name() {
        let detector = Detector::new();
        let findings = detector.detect("Witness: Julie Terry", 0.4);
        let role = findings.iter().find(|f| f.pii_type == "LEGAL_ROLE_NAME");
        assert!(role.is_some(), "expected a LEGAL_ROLE_NAME finding: {findings:?}");
        assert!(role.unwrap().confidence >= 0.6);
        // The underlying PERSON finding for the same span must be suppressed.
        assert!(findings.iter().all(|f| f.pii_type != "PERSON"));
    }

    #[test]
    fn invalid_luhn_card_produces_no_finding() {
        let detector = Detector::new();
        let findings = detector.detect("Card 4111 1111 1111 1112", 0.0);
        assert!(findings.iter().all(|f| f.pii_type != "CREDIT_CARD"));
    }

    #[test]
    fn empty_text_yields_no_findings() {
        let detector = Detector::new();
        assert!(detector.detect("", 0.0).is_empty());
    }
}
