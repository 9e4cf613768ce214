//! The "named-entity model" called for by §4.3. Implemented as a tuned
//! regex backend in the same style as the teacher's
//! `foia_annotate::services::ner::RegexNerBackend`, generalized from
//! FOIA/government entities to courtroom participants (titles, plain
//! capitalized two-token names, US states and generic place references).
//!
//! A statistical backend could replace this behind the same [`Recognizer`]
//! seam without touching the detector pipeline — the pluggability §9 calls
//! for, implemented as a trait rather than a loaded plugin.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Recognizer, SpanMatch};

static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?:Judge|Justice|Attorney|Officer|Detective|Deputy|Sergeant|Captain|Dr\.|Prof\.|Mr\.|Mrs\.|Ms\.)\s+)([A-Z][a-z]+(?:\s+[A-Z]\.?)?\s+[A-Z][a-z]+)",
    )
    .expect("title pattern should compile")
});

// `regex` has no lookbehind, so a leading capitalized word (a sentence-
// initial verb like "Contact", a role noun like "Defendant") is consumed as
// an optional, non-capturing prefix rather than folded into the captured
// name — otherwise the leftmost match on "Contact John Smith" binds
// "Contact John" instead of "John Smith".
static CAPITALIZED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Z][a-z]+\s+)?([A-Z][a-z]{2,}(?:\s+[A-Z]\.?\s+|\s+)[A-Z][a-z]{2,})\b")
        .expect("capitalized name pattern should compile")
});

static US_STATES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
        "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa",
        "Kansas", "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan",
        "Minnesota", "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire",
        "New Jersey", "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio",
        "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota",
        "Tennessee", "Texas", "Utah", "Vermont", "Virginia", "Washington", "West Virginia",
        "Wisconsin", "Wyoming",
    ]
    .into_iter()
    .collect()
});

static LOCATION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Z][a-z]+ (?:County|City|Parish)|[A-Z][a-z]+, [A-Z]{2})\b").unwrap()
});

// Names that match the capitalized-two-token shape but aren't people.
static NAME_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "United States",
        "New York",
        "New Jersey",
        "New Mexico",
        "New Hampshire",
        "North Carolina",
        "North Dakota",
        "South Carolina",
        "South Dakota",
        "West Virginia",
        "District Court",
        "Superior Court",
        "Supreme Court",
    ]
    .into_iter()
    .collect()
});

fn is_plausible_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 4 {
        return false;
    }
    parts.iter().all(|p| {
        let first = p.chars().next().unwrap_or('a');
        first.is_uppercase() && p.trim_end_matches('.').len() >= 2
    })
}

pub struct PersonRecognizer;

impl Recognizer for PersonRecognizer {
    fn name(&self) -> &'static str {
        "PERSON"
    }

    fn analyze(&self, text: &str) -> Vec<SpanMatch> {
        let mut seen_spans: Vec<(usize, usize)> = Vec::new();
        let mut matches = Vec::new();

        for cap in TITLE_PATTERN.captures_iter(text) {
            if let Some(m) = cap.get(1) {
                let name = m.as_str().trim();
                if is_plausible_name(name) && !overlaps(&seen_spans, m.start(), m.end()) {
                    seen_spans.push((m.start(), m.end()));
                    matches.push(SpanMatch {
                        pii_type: "PERSON",
                        start: m.start(),
                        end: m.end(),
                        base_confidence: 0.9,
                    });
                }
            }
        }

        for cap in CAPITALIZED_NAME.captures_iter(text) {
            if let Some(m) = cap.get(1) {
                let name = m.as_str().trim();
                if is_plausible_name(name)
                    && !NAME_STOPWORDS.contains(name)
                    && !overlaps(&seen_spans, m.start(), m.end())
                {
                    seen_spans.push((m.start(), m.end()));
                    matches.push(SpanMatch {
                        pii_type: "PERSON",
                        start: m.start(),
                        end: m.end(),
                        base_confidence: 0.85,
                    });
                }
            }
        }

        matches
    }
}

fn overlaps(seen: &[(usize, usize)], start: usize, end: usize) -> bool {
    seen.iter().any(|&(s, e)| start < e && s < end)
}

pub struct LocationRecognizer;

impl Recognizer for LocationRecognizer {
    fn name(&self) -> &'static str {
        "LOCATION"
    }

    fn analyze(&self, text: &str) -> Vec<SpanMatch> {
        let mut matches = Vec::new();

        for state in US_STATES.iter() {
            let mut search_from = 0;
            while let Some(rel) = text[search_from..].find(state) {
                let start = search_from + rel;
                let end = start + state.len();
                let boundary_ok = word_boundary(text, start, end);
                if boundary_ok {
                    matches.push(SpanMatch {
                        pii_type: "LOCATION",
                        start,
                        end,
                        base_confidence: 0.6,
                    });
                }
                search_from = end;
            }
        }

        for cap in LOCATION_WORD.captures_iter(text) {
            if let Some(m) = cap.get(0) {
                matches.push(SpanMatch {
                    pii_type: "LOCATION",
                    start: m.start(),
                    end: m.end(),
                    base_confidence: 0.55,
                });
            }
        }

        matches
    }
}

fn word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map(|c| !c.is_alphanumeric())
        .unwrap_or(true);
    let after_ok = text[end..]
        .chars()
        .next()
        .map(|c| !c.is_alphanumeric())
        .unwrap_or(true);
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_recognizer_finds_plain_name() {
        let text = "Contact John Smith at the office.";
        let matches = PersonRecognizer.analyze(text);
        // The leading verb "Contact" must not be folded into the name span.
        assert!(matches.iter().any(|m| &text[m.start..m.end] == "John Smith"));
        assert!(matches.iter().all(|m| &text[m.start..m.end] != "Contact John"));
    }

    #[test]
    fn person_recognizer_finds_titled_name() {
        let matches = PersonRecognizer.analyze("Judge Maria Lopez presided over the hearing.");
        let text = "Judge Maria Lopez presided over the hearing.";
        assert!(matches
            .iter()
            .any(|m| &text[m.start..m.end] == "Maria Lopez"));
    }

    #[test]
    fn person_recognizer_skips_court_stopwords() {
        let matches = PersonRecognizer.analyze("Filed with the District Court today.");
        assert!(matches.is_empty());
    }

    #[test]
    fn location_recognizer_finds_state() {
        let matches = LocationRecognizer.analyze("The incident occurred in Texas last year.");
        assert!(matches.iter().any(|m| m.pii_type == "LOCATION"));
    }
}
