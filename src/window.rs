//! Candidate window generation for the alignment engine.
//!
//! A [`WindowStrategy`] decides where a match window may end: at sentence
//! boundaries ([`SentenceWindows`]) or at any char offset
//! ([`CharacterWindows`]). The engine is the same for both; only these two
//! decisions differ.

use std::collections::HashMap;

use crate::boundary::SentenceBoundaries;
use crate::text::MasterText;
use crate::tokenize::{tokenize, TokenSet};

/// Length limits for a fuzzy window starting at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimits {
    pub min_len: usize,
    pub max_len: usize,
}

impl WindowLimits {
    /// Compute `[min_len, max_len]` for a script of `script_len` chars.
    ///
    /// `min_len = max(1, min(remaining, floor(script_len * (1 - contraction))))`
    /// `max_len = max(min_len, min(remaining, script_len + expansion))`
    pub fn new(script_len: usize, remaining: usize, max_contraction: f64, max_expansion: usize) -> Self {
        let contracted = (script_len as f64 * (1.0 - max_contraction)).floor() as usize;
        let min_len = remaining.min(contracted).max(1);
        let max_len = remaining
            .min(script_len.saturating_add(max_expansion))
            .max(min_len);

        Self { min_len, max_len }
    }

    pub fn contains(&self, len: usize) -> bool {
        len >= self.min_len && len <= self.max_len
    }
}

/// Where windows may end.
pub trait WindowStrategy {
    /// End offset for an exact prefix match whose literal script ends at
    /// `script_end`. Never less than `script_end`.
    fn snap_exact(&self, cursor: usize, script_end: usize) -> usize;

    /// Candidate end offsets for a fuzzy window starting at `cursor`, in
    /// ascending order.
    fn candidate_ends(&self, cursor: usize, limits: WindowLimits) -> Vec<usize>;
}

/// Windows snapped to sentence ends.
#[derive(Debug, Clone)]
pub struct SentenceWindows {
    boundaries: SentenceBoundaries,
}

impl SentenceWindows {
    pub fn new(boundaries: SentenceBoundaries) -> Self {
        Self { boundaries }
    }

    pub fn boundaries(&self) -> &SentenceBoundaries {
        &self.boundaries
    }
}

impl WindowStrategy for SentenceWindows {
    fn snap_exact(&self, _cursor: usize, script_end: usize) -> usize {
        match self.boundaries.containing(script_end.saturating_sub(1)) {
            Some(sentence) => sentence.end.max(script_end),
            None => script_end,
        }
    }

    /// Sentence ends at or after `cursor` whose window length lies within the
    /// limits. When none does, the first end past `max_len` is used so the
    /// window still closes on a whole sentence; failing that, the text end.
    fn candidate_ends(&self, cursor: usize, limits: WindowLimits) -> Vec<usize> {
        let spans = self.boundaries.spans();
        let Some(first) = self.boundaries.index_of(cursor) else {
            return Vec::new();
        };

        let mut ends = Vec::new();
        for sentence in &spans[first..] {
            if sentence.end <= cursor {
                continue;
            }
            let len = sentence.end - cursor;
            if len < limits.min_len {
                continue;
            }
            if len > limits.max_len {
                if ends.is_empty() {
                    ends.push(sentence.end);
                }
                break;
            }
            ends.push(sentence.end);
        }

        if ends.is_empty() {
            if let Some(last) = spans.last() {
                ends.push(last.end);
            }
        }

        ends
    }
}

/// Windows ending at every char offset.
#[derive(Debug, Clone, Copy)]
pub struct CharacterWindows;

impl WindowStrategy for CharacterWindows {
    fn snap_exact(&self, _cursor: usize, script_end: usize) -> usize {
        script_end
    }

    fn candidate_ends(&self, cursor: usize, limits: WindowLimits) -> Vec<usize> {
        (limits.min_len..=limits.max_len)
            .map(|len| cursor + len)
            .collect()
    }
}

/// Token sets of the windows scored at one cursor, keyed by window length.
///
/// Entries belong to a single cursor; asking for a window at another cursor
/// drops them first.
#[derive(Debug, Default)]
pub struct WindowCache {
    cursor: usize,
    entries: HashMap<usize, TokenSet>,
}

impl WindowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor the current entries were scored at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Token set of `text[cursor..cursor + len]`, tokenized at most once.
    pub fn tokens(&mut self, text: &MasterText<'_>, cursor: usize, len: usize) -> &TokenSet {
        if cursor != self.cursor {
            self.entries.clear();
            self.cursor = cursor;
        }
        self.entries
            .entry(len)
            .or_insert_with(|| tokenize(text.slice(cursor, cursor + len)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::PunctuationSplitter;

    fn sentence_windows(text: &str) -> SentenceWindows {
        let master = MasterText::new(text);
        SentenceWindows::new(SentenceBoundaries::compute(&master, &PunctuationSplitter))
    }

    #[test]
    fn test_limits_basic() {
        let limits = WindowLimits::new(100, 1000, 0.4, 200);
        assert_eq!(limits, WindowLimits { min_len: 60, max_len: 300 });
    }

    #[test]
    fn test_limits_clamped_by_remaining() {
        let limits = WindowLimits::new(100, 50, 0.4, 200);
        assert_eq!(limits, WindowLimits { min_len: 50, max_len: 50 });
    }

    #[test]
    fn test_limits_min_at_least_one() {
        let limits = WindowLimits::new(1, 10, 0.9, 0);
        assert_eq!(limits.min_len, 1);
        assert_eq!(limits.max_len, 1);
        assert!(limits.contains(1));
        assert!(!limits.contains(2));
    }

    #[test]
    fn test_sentence_snap_exact_forward_only() {
        let windows = sentence_windows("One two. Three four.");
        // Literal script "One tw" ends mid-sentence: snaps to the sentence end
        assert_eq!(windows.snap_exact(0, 6), 9);
        // Script already ending at the boundary stays put
        assert_eq!(windows.snap_exact(0, 9), 9);
        assert_eq!(windows.snap_exact(9, 20), 20);
    }

    #[test]
    fn test_sentence_candidates_within_limits() {
        // Sentence ends: 6, 12, 18, 23
        let windows = sentence_windows("Aaaa. Bbbb. Cccc. Dddd.");
        let ends = windows.candidate_ends(0, WindowLimits { min_len: 7, max_len: 18 });
        assert_eq!(ends, vec![12, 18]);
    }

    #[test]
    fn test_sentence_candidates_force_next_sentence() {
        let windows = sentence_windows("Aaaaaaaaaaaaaaaa. Bbbb.");
        let ends = windows.candidate_ends(0, WindowLimits { min_len: 2, max_len: 5 });
        assert_eq!(ends, vec![18]);
    }

    #[test]
    fn test_sentence_candidates_from_mid_text_cursor() {
        let windows = sentence_windows("Aaaa. Bbbb. Cccc.");
        let ends = windows.candidate_ends(6, WindowLimits { min_len: 1, max_len: 11 });
        assert_eq!(ends, vec![12, 17]);
    }

    #[test]
    fn test_character_candidates() {
        let ends = CharacterWindows.candidate_ends(10, WindowLimits { min_len: 2, max_len: 5 });
        assert_eq!(ends, vec![12, 13, 14, 15]);
        assert_eq!(CharacterWindows.snap_exact(0, 7), 7);
    }

    #[test]
    fn test_window_cache_reuses_entries() {
        let master = MasterText::new("the quick brown fox");
        let mut cache = WindowCache::new();
        assert!(cache.is_empty());

        assert_eq!(cache.tokens(&master, 0, 9).tokens, vec!["the", "quick"]);
        assert_eq!(cache.len(), 1);
        cache.tokens(&master, 0, 9);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.tokens(&master, 0, 15).tokens, vec!["the", "quick", "brown"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_window_cache_drops_entries_on_new_cursor() {
        let master = MasterText::new("the quick brown fox");
        let mut cache = WindowCache::new();

        cache.tokens(&master, 0, 3);
        cache.tokens(&master, 0, 9);
        assert_eq!(cache.len(), 2);

        // Same length at another cursor is a different window
        assert_eq!(cache.tokens(&master, 4, 9).tokens, vec!["quick", "bro"]);
        assert_eq!(cache.cursor(), 4);
        assert_eq!(cache.len(), 1);
    }
}
