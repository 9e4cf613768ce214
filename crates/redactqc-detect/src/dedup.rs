//! Overlap resolution, per §4.3 step 2: findings occupying the exact same
//! `[offset, offset+length)` interval are reconciled to one; findings that
//! only partially overlap are kept as distinct findings.

use crate::severity::severity;
use crate::types::DetectedFinding;

/// Reconcile findings sharing an identical span, keeping the
/// highest-severity one; ties broken by confidence, then by
/// `pii_type` lexicographic order, both deterministic per §4.3.
pub fn resolve(mut findings: Vec<DetectedFinding>) -> Vec<DetectedFinding> {
    findings.sort_by(|a, b| {
        a.char_offset
            .cmp(&b.char_offset)
            .then(a.char_length.cmp(&b.char_length))
    });

    let mut resolved: Vec<DetectedFinding> = Vec::with_capacity(findings.len());
    let mut i = 0;
    while i < findings.len() {
        let mut j = i + 1;
        let mut best = i;
        while j < findings.len()
            && findings[j].char_offset == findings[i].char_offset
            && findings[j].char_length == findings[i].char_length
        {
            if is_better(&findings[j], &findings[best]) {
                best = j;
            }
            j += 1;
        }
        resolved.push(findings[best].clone());
        i = j;
    }

    resolved
}

fn is_better(candidate: &DetectedFinding, incumbent: &DetectedFinding) -> bool {
    let cand_sev = severity(&candidate.pii_type);
    let inc_sev = severity(&incumbent.pii_type);
    if cand_sev != inc_sev {
        return cand_sev > inc_sev;
    }
    if candidate.confidence != incumbent.confidence {
        return candidate.confidence > incumbent.confidence;
    }
    candidate.pii_type < incumbent.pii_type
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(pii_type: &str, confidence: f64, offset: usize, len: usize) -> DetectedFinding {
        DetectedFinding {
            pii_type: pii_type.to_string(),
            confidence,
            char_offset: offset,
            char_length: len,
            context_snippet: String::new(),
        }
    }

    #[test]
    fn identical_spans_keep_higher_severity() {
        let input = vec![finding("URL", 0.9, 10, 5), finding("US_SSN", 0.6, 10, 5)];
        let resolved = resolve(input);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].pii_type, "US_SSN");
    }

    #[test]
    fn partial_overlaps_both_retained() {
        let input = vec![finding("PERSON", 0.8, 10, 10), finding("LOCATION", 0.7, 15, 10)];
        let resolved = resolve(input);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn ties_broken_by_confidence_then_lexicographic() {
        let input = vec![finding("PERSON", 0.8, 0, 5), finding("LOCATION", 0.8, 0, 5)];
        // Neither PERSON(3) nor LOCATION(2) share severity so PERSON wins by severity here;
        // use two same-severity types to exercise the lexicographic tie-break.
        let resolved = resolve(input);
        assert_eq!(resolved[0].pii_type, "PERSON");

        let tie = vec![finding("MAC_ADDRESS", 0.8, 0, 5), finding("CASE_NUMBER", 0.8, 0, 5)];
        let resolved_tie = resolve(tie);
        assert_eq!(resolved_tie[0].pii_type, "CASE_NUMBER");
    }
}
