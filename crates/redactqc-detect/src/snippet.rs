//! Context snippet construction, per §4.3: a bounded window of text around
//! a finding, with line breaks collapsed and a hard byte cap enforced.

use redactqc_core::limits::{CONTEXT_MAX, SNIPPET_HARD_CAP};

/// Snap a byte offset down/up to the nearest UTF-8 char boundary, since the
/// window math below can otherwise land mid-codepoint on non-ASCII text.
fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx.min(text.len())
}

/// Build the stored `context_snippet` for a finding at `[offset, offset+len)`
/// within `text`. Collapses CR/LF to single spaces and truncates to
/// [`SNIPPET_HARD_CAP`] bytes if the computed window still exceeds it.
pub fn build(text: &str, offset: usize, len: usize) -> String {
    let window = ((CONTEXT_MAX.saturating_sub(len)) / 2).max(8);

    let start = floor_char_boundary(text, offset.saturating_sub(window));
    let end = ceil_char_boundary(text, (offset + len + window).min(text.len()));

    let raw = &text[start..end];
    let collapsed: String = raw
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();

    if collapsed.len() <= SNIPPET_HARD_CAP {
        collapsed
    } else {
        let cut = floor_char_boundary(&collapsed, SNIPPET_HARD_CAP);
        collapsed[..cut].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_collapses_newlines() {
        let text = "line one\r\nJohn Smith\r\nline three";
        let offset = text.find("John Smith").unwrap();
        let snippet = build(text, offset, "John Smith".len());
        assert!(!snippet.contains('\n'));
        assert!(!snippet.contains('\r'));
        assert!(snippet.contains("John Smith"));
    }

    #[test]
    fn snippet_never_exceeds_hard_cap() {
        let text = "x".repeat(1000);
        let snippet = build(&text, 500, 1);
        assert!(snippet.len() <= SNIPPET_HARD_CAP);
    }

    #[test]
    fn snippet_window_has_minimum_width() {
        // CONTEXT_MAX - len could go negative for a long match; window floors at 8.
        let text = format!("{}{}", "a".repeat(8), "b".repeat(200));
        let snippet = build(&text, 8, 200);
        assert!(snippet.len() >= 200);
    }
}
