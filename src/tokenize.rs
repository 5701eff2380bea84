//! Comparison tokens for similarity scoring.
//!
//! Tokens drive scoring only; they never alter the surface text that ends up
//! in an alignment span.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

// Word runs (letters, then letters/marks/dashes/connectors/digits),
// standalone digit runs, and runs of anything else that is not whitespace.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{L}+[\p{L}\p{Mn}\p{Pd}\p{Pc}\p{Nd}]*|\p{Nd}+|[^\s\p{L}\p{Nd}]+")
        .expect("Invalid token regex pattern")
});

/// Normalized tokens of a text span, in order, with per-token counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    pub tokens: Vec<String>,
    pub counts: HashMap<String, usize>,
}

impl TokenSet {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Occurrences of `token` in this set.
    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }
}

/// Lowercase a raw token and fold a naive plural.
///
/// Tokens longer than three chars ending in a single `s` lose it:
/// "seeds" -> "seed", "glass" stays "glass", "was" stays "was".
pub fn normalize_token(token: &str) -> String {
    let lower = token.to_lowercase();
    if lower.chars().count() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
        let mut folded = lower;
        folded.pop();
        return folded;
    }
    lower
}

/// Split `text` into normalized comparison tokens.
pub fn tokenize(text: &str) -> TokenSet {
    let mut set = TokenSet::default();

    for raw in TOKEN_PATTERN.find_iter(text) {
        let normalized = normalize_token(raw.as_str());
        if normalized.is_empty() {
            continue;
        }
        *set.counts.entry(normalized.clone()).or_default() += 1;
        set.tokens.push(normalized);
    }

    set
}
