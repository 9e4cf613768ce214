//! Minimal whitespace/punctuation tokenizer used to measure "within
//! CONTEXT_WINDOW tokens" for both the boost/penalty scoring and the
//! `LEGAL_ROLE_NAME` promotion rule. Deliberately simple: the spec's
//! context window is a token count, not a linguistic notion, so a
//! byte-offset token list is sufficient and keeps this crate dependency-free
//! beyond `regex`.

/// A single token's byte span within the source text.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub start: usize,
    pub end: usize,
}

/// Split `text` into word tokens (runs of alphanumeric/`_`/`.`/`@` characters,
/// which keeps emails and dotted abbreviations as one token), recording each
/// token's byte offsets.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        let is_word = ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == '@';
        match (is_word, start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                tokens.push(Token { start: s, end: idx });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            start: s,
            end: text.len(),
        });
    }
    tokens
}

/// Token index covering (or immediately preceding) byte offset `pos`.
fn token_index_at_or_before(tokens: &[Token], pos: usize) -> Option<usize> {
    let mut best = None;
    for (i, t) in tokens.iter().enumerate() {
        if t.start <= pos {
            best = Some(i);
        } else {
            break;
        }
    }
    best
}

/// Whether any token whose lowercased text matches one of `words` lies
/// within `window` tokens of the span `[start, end)`, in either direction.
pub fn context_word_nearby(
    text: &str,
    tokens: &[Token],
    start: usize,
    end: usize,
    words: &[&str],
    window: usize,
) -> bool {
    let lo = token_index_at_or_before(tokens, start);
    let hi = token_index_at_or_before(tokens, end.saturating_sub(1).max(start));

    let (Some(lo), Some(hi)) = (lo, hi) else {
        return false;
    };

    let scan_start = lo.saturating_sub(window);
    let scan_end = (hi + window).min(tokens.len().saturating_sub(1));

    for tok in &tokens[scan_start..=scan_end.max(scan_start)] {
        let token_text = &text[tok.start..tok.end];
        if words
            .iter()
            .any(|w| token_text.eq_ignore_ascii_case(w))
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_punctuation() {
        let toks = tokenize("Witness: Julie Terry, age 40.");
        let words: Vec<&str> = toks
            .iter()
            .map(|t| &"Witness: Julie Terry, age 40."[t.start..t.end])
            .collect();
        assert_eq!(words, vec!["Witness", "Julie", "Terry", "age", "40."]);
    }

    #[test]
    fn context_word_nearby_finds_preceding_keyword() {
        let text = "Witness: Julie Terry";
        let toks = tokenize(text);
        let person_start = text.find("Julie").unwrap();
        let person_end = person_start + "Julie Terry".len();
        assert!(context_word_nearby(
            text, &toks, person_start, person_end, &["witness"], 6
        ));
    }

    #[test]
    fn context_word_nearby_respects_window() {
        let text = "witness far far far far far far far Julie Terry";
        let toks = tokenize(text);
        let person_start = text.find("Julie").unwrap();
        let person_end = person_start + "Julie Terry".len();
        assert!(!context_word_nearby(
            text, &toks, person_start, person_end, &["witness"], 2
        ));
    }
}
