//! Sentence boundary detection over the master text.
//!
//! A [`SentenceSplitter`] proposes raw sentence spans; [`SentenceBoundaries`]
//! normalizes them into an ordered, gapless list of `[start, end)` char ranges
//! covering the whole text, where each `end` sits past the sentence's trailing
//! whitespace so the next sentence starts exactly there.

use crate::models::{Bounds, SplitterKind};
use crate::text::MasterText;
use std::cmp::Ordering;
use std::ops::Range;

/// Chars that may trail a terminal mark and still belong to the sentence.
const CLOSING_CHARS: &[char] = &['"', '\'', '”', '’', ')', ']', '}', '»', '>'];

/// Sentence-terminating chars for the punctuation scan.
const TERMINAL_CHARS: &[char] = &['.', '!', '?', '…'];

/// Provider of raw sentence spans.
///
/// Implementations return ordered, non-overlapping byte ranges into `text`.
/// Ranges need not cover whitespace between sentences; normalization takes
/// care of that.
pub trait SentenceSplitter: Send + Sync {
    fn name(&self) -> &'static str;

    fn split(&self, text: &str) -> Vec<Range<usize>>;
}

/// UAX #29 sentence boundaries via `unicode-segmentation`.
#[cfg(feature = "unicode-sentences")]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSplitter;

#[cfg(feature = "unicode-sentences")]
impl SentenceSplitter for UnicodeSentenceSplitter {
    fn name(&self) -> &'static str {
        "unicode"
    }

    fn split(&self, text: &str) -> Vec<Range<usize>> {
        use unicode_segmentation::UnicodeSegmentation;

        text.split_sentence_bound_indices()
            .map(|(start, sentence)| start..start + sentence.len())
            .collect()
    }
}

/// Heuristic scan for `.`, `!`, `?` or `…`, followed by closing quotes or
/// brackets and whitespace.
///
/// Leading whitespace before a sentence is skipped; a trailing run without a
/// terminal mark becomes the last sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSplitter;

impl SentenceSplitter for PunctuationSplitter {
    fn name(&self) -> &'static str {
        "punctuation"
    }

    fn split(&self, text: &str) -> Vec<Range<usize>> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let len = chars.len();
        let byte_at = |i: usize| if i < len { chars[i].0 } else { text.len() };

        let mut sentences = Vec::new();
        let mut i = 0;

        while i < len {
            while i < len && chars[i].1.is_whitespace() {
                i += 1;
            }
            if i >= len {
                break;
            }

            let mut j = i;
            let mut ended = false;
            while j < len {
                if TERMINAL_CHARS.contains(&chars[j].1) {
                    j += 1;
                    while j < len && CLOSING_CHARS.contains(&chars[j].1) {
                        j += 1;
                    }
                    while j < len && chars[j].1.is_whitespace() {
                        j += 1;
                    }
                    ended = true;
                    break;
                }
                j += 1;
            }
            if !ended {
                j = len;
            }

            sentences.push(byte_at(i)..byte_at(j));
            i = j;
        }

        sentences
    }
}

/// Pick the sentence provider for `kind`.
///
/// `Auto` resolves to the Unicode provider when the `unicode-sentences`
/// feature is compiled in, and to the punctuation scan otherwise.
pub fn resolve_splitter(kind: SplitterKind) -> Box<dyn SentenceSplitter> {
    match kind {
        SplitterKind::Punctuation => Box::new(PunctuationSplitter),
        SplitterKind::Auto | SplitterKind::Unicode => unicode_or_fallback(kind),
    }
}

#[cfg(feature = "unicode-sentences")]
fn unicode_or_fallback(_kind: SplitterKind) -> Box<dyn SentenceSplitter> {
    Box::new(UnicodeSentenceSplitter)
}

#[cfg(not(feature = "unicode-sentences"))]
fn unicode_or_fallback(kind: SplitterKind) -> Box<dyn SentenceSplitter> {
    if kind == SplitterKind::Unicode {
        log::warn!("Unicode sentence splitter not compiled in, using punctuation scan");
    }
    Box::new(PunctuationSplitter)
}

/// Ordered, gapless sentence spans of one master text, in char offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceBoundaries {
    spans: Vec<Bounds>,
}

impl SentenceBoundaries {
    /// Compute boundaries for `text` using `splitter`.
    ///
    /// - Empty text yields no boundaries.
    /// - Non-empty text with no provider output yields one span over the text.
    /// - Each span starts where the previous one ended and its end is pushed
    ///   past trailing whitespace.
    /// - A final span is appended if the provider stops short of the end.
    pub fn compute(text: &MasterText<'_>, splitter: &dyn SentenceSplitter) -> Self {
        let len = text.char_len();
        if len == 0 {
            return Self::default();
        }

        let mut spans: Vec<Bounds> = Vec::new();
        let mut last_end = 0usize;

        for range in splitter.split(text.as_str()) {
            let raw_end = text.char_offset(range.end).min(len);
            let mut end = raw_end;
            while let Some(ch) = text.char_at(end) {
                if !ch.is_whitespace() {
                    break;
                }
                end += 1;
            }
            if end <= last_end {
                continue;
            }
            spans.push(Bounds::new(last_end, end));
            last_end = end;
        }

        if spans.is_empty() {
            return Self {
                spans: vec![Bounds::new(0, len)],
            };
        }

        if last_end < len {
            spans.push(Bounds::new(last_end, len));
        }

        log::trace!(
            "Computed {} sentence boundaries with {} splitter",
            spans.len(),
            splitter.name()
        );

        Self { spans }
    }

    pub fn spans(&self) -> &[Bounds] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Index of the sentence containing char offset `pos`.
    ///
    /// Offsets outside every span clamp to the nearest preceding span (or the
    /// first). Returns `None` only when there are no spans.
    pub fn index_of(&self, pos: usize) -> Option<usize> {
        if self.spans.is_empty() {
            return None;
        }

        let idx = self
            .spans
            .binary_search_by(|span| {
                if pos < span.start {
                    Ordering::Greater
                } else if pos >= span.end {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .unwrap_or_else(|idx| idx.saturating_sub(1).min(self.spans.len() - 1));

        Some(idx)
    }

    /// The sentence containing char offset `pos`, clamped like [`Self::index_of`].
    pub fn containing(&self, pos: usize) -> Option<Bounds> {
        self.index_of(pos).map(|idx| self.spans[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds_with(text: &str, splitter: &dyn SentenceSplitter) -> Vec<(usize, usize)> {
        let master = MasterText::new(text);
        SentenceBoundaries::compute(&master, splitter)
            .spans()
            .iter()
            .map(|b| (b.start, b.end))
            .collect()
    }

    fn assert_gapless(spans: &[(usize, usize)], len: usize) {
        assert_eq!(spans.first().map(|s| s.0), Some(0));
        assert_eq!(spans.last().map(|s| s.1), Some(len));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn test_punctuation_basic() {
        let spans = bounds_with("One. Two! Three?", &PunctuationSplitter);
        assert_eq!(spans, vec![(0, 5), (5, 10), (10, 16)]);
    }

    #[test]
    fn test_punctuation_closing_quotes_and_brackets() {
        let text = "He said \"stop.\" Then (he left.) Done";
        let spans = bounds_with(text, &PunctuationSplitter);
        assert_eq!(spans, vec![(0, 16), (16, 32), (32, 36)]);
        assert_gapless(&spans, text.chars().count());
    }

    #[test]
    fn test_punctuation_ellipsis_and_newlines() {
        let text = "Wait… what?\n\nYes.";
        let spans = bounds_with(text, &PunctuationSplitter);
        assert_eq!(spans, vec![(0, 6), (6, 13), (13, 17)]);
    }

    #[test]
    fn test_leading_whitespace_absorbed() {
        let spans = bounds_with("  Hello. World.", &PunctuationSplitter);
        assert_eq!(spans, vec![(0, 9), (9, 15)]);
    }

    #[test]
    fn test_no_terminal_punctuation() {
        let spans = bounds_with("no punctuation here", &PunctuationSplitter);
        assert_eq!(spans, vec![(0, 19)]);
    }

    #[test]
    fn test_empty_text() {
        assert!(bounds_with("", &PunctuationSplitter).is_empty());
    }

    #[test]
    fn test_whitespace_only_text() {
        let spans = bounds_with("   ", &PunctuationSplitter);
        assert_eq!(spans, vec![(0, 3)]);
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let text = "Ça va. Très bien…";
        let spans = bounds_with(text, &PunctuationSplitter);
        assert_eq!(spans, vec![(0, 7), (7, 17)]);
    }

    #[cfg(feature = "unicode-sentences")]
    #[test]
    fn test_unicode_splitter_story() {
        let text = "Lena walked into the forest.\nShe followed a narrow path until she found an ancient tree.\nThe tree whispered secrets and offered her a glowing seed.\nShe returned home determined to plant it.";
        let spans = bounds_with(text, &UnicodeSentenceSplitter);
        assert_eq!(spans, vec![(0, 29), (29, 89), (89, 148), (148, 189)]);
    }

    #[cfg(feature = "unicode-sentences")]
    #[test]
    fn test_unicode_splitter_gapless() {
        let text = "Mr. Smith went home. \"Really?\" she asked.   Yes!  ";
        let spans = bounds_with(text, &UnicodeSentenceSplitter);
        assert_gapless(&spans, text.chars().count());
    }

    #[test]
    fn test_index_of_binary_search() {
        let master = MasterText::new("One. Two! Three?");
        let boundaries = SentenceBoundaries::compute(&master, &PunctuationSplitter);

        assert_eq!(boundaries.index_of(0), Some(0));
        assert_eq!(boundaries.index_of(4), Some(0));
        assert_eq!(boundaries.index_of(5), Some(1));
        assert_eq!(boundaries.index_of(15), Some(2));
        // Past the end clamps to the last sentence
        assert_eq!(boundaries.index_of(100), Some(2));
        assert_eq!(boundaries.containing(7), Some(Bounds::new(5, 10)));
    }

    #[test]
    fn test_index_of_empty() {
        let boundaries = SentenceBoundaries::default();
        assert_eq!(boundaries.index_of(0), None);
        assert_eq!(boundaries.containing(3), None);
    }

    #[test]
    fn test_resolve_splitter() {
        assert_eq!(resolve_splitter(SplitterKind::Punctuation).name(), "punctuation");
        #[cfg(feature = "unicode-sentences")]
        assert_eq!(resolve_splitter(SplitterKind::Auto).name(), "unicode");
        #[cfg(not(feature = "unicode-sentences"))]
        assert_eq!(resolve_splitter(SplitterKind::Auto).name(), "punctuation");
    }

    /// Splitter returning fixed byte ranges.
    struct FixedSplitter(Vec<Range<usize>>);

    impl SentenceSplitter for FixedSplitter {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn split(&self, _text: &str) -> Vec<Range<usize>> {
            self.0.clone()
        }
    }

    #[test]
    fn test_compute_appends_tail_when_provider_stops_short() {
        let spans = bounds_with("One. Two", &FixedSplitter(vec![0..4]));
        assert_eq!(spans, vec![(0, 5), (5, 8)]);
    }

    #[test]
    fn test_compute_skips_ranges_that_do_not_advance() {
        let text = "One. Two. Three.";
        let splitter = FixedSplitter(vec![0..4, 0..4, 5..9, 3..8]);
        let spans = bounds_with(text, &splitter);
        assert_eq!(spans, vec![(0, 5), (5, 10), (10, 16)]);
    }

    #[test]
    fn test_compute_without_provider_output_covers_text() {
        let spans = bounds_with("No terminal mark", &FixedSplitter(Vec::new()));
        assert_eq!(spans, vec![(0, 16)]);
    }
}
