//! Sequential cursor-driven alignment of segments onto the master text.
//!
//! This is the HOT PATH. Each segment is tried as a literal prefix at the
//! cursor first, then by a fuzzy search over candidate windows. The cursor
//! only moves forward, and the last segment always closes the text, so a
//! successful run partitions the master text into contiguous spans.

use thiserror::Error;

use crate::boundary::{resolve_splitter, SentenceBoundaries};
use crate::models::{AlignmentParams, AlignmentSpan, BoundaryMode, Segment};
use crate::similarity::similarity_ratio;
use crate::text::MasterText;
use crate::tokenize::{tokenize, TokenSet};
use crate::window::{CharacterWindows, SentenceWindows, WindowCache, WindowLimits, WindowStrategy};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    #[error("segment {index} has an empty script")]
    InvalidSegment { index: usize },
    #[error("invalid alignment parameters: {0}")]
    InvalidParams(String),
    #[error("cursor {cursor} exceeded master text length {len}")]
    CursorOverrun { cursor: usize, len: usize },
    #[error("could not fuzzily align segment {index} ({label}): best similarity {best_similarity:.3}")]
    NoFuzzyMatch {
        index: usize,
        label: String,
        best_similarity: f64,
    },
    #[error("alignment did not consume the full text, {remaining} characters remain")]
    IncompleteReconstruction { remaining: usize },
}

/// Best fuzzy window found at a cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FuzzyCandidate {
    end: usize,
    similarity: f64,
}

/// Align `segments`, in order, onto `master_text`.
///
/// On success the returned spans are contiguous, start at 0, end at the
/// text's char length, and their matched text concatenates back into
/// `master_text`. Any failure aborts the whole call.
pub fn align(
    master_text: &str,
    segments: &[Segment],
    params: &AlignmentParams,
) -> Result<Vec<AlignmentSpan>, AlignError> {
    params.validate().map_err(AlignError::InvalidParams)?;

    let text = MasterText::new(master_text);

    match params.boundary_mode {
        BoundaryMode::Sentence => {
            let splitter = resolve_splitter(params.splitter);
            let boundaries = SentenceBoundaries::compute(&text, splitter.as_ref());
            log::debug!(
                "Sentence mode: {} boundaries ({} splitter)",
                boundaries.len(),
                splitter.name()
            );
            Aligner::new(&text, SentenceWindows::new(boundaries), params).run(segments)
        }
        BoundaryMode::Word => Aligner::new(&text, CharacterWindows, params).run(segments),
    }
}

/// Alignment engine over one master text, parameterized by where windows may end.
pub struct Aligner<'a, S: WindowStrategy> {
    text: &'a MasterText<'a>,
    strategy: S,
    params: &'a AlignmentParams,
}

impl<'a, S: WindowStrategy> Aligner<'a, S> {
    pub fn new(text: &'a MasterText<'a>, strategy: S, params: &'a AlignmentParams) -> Self {
        Self {
            text,
            strategy,
            params,
        }
    }

    /// Run the alignment over all segments.
    pub fn run(&self, segments: &[Segment]) -> Result<Vec<AlignmentSpan>, AlignError> {
        let len = self.text.char_len();
        let mut cursor = 0usize;
        let mut spans = Vec::with_capacity(segments.len());
        // Holds only the windows of the latest fuzzy search
        let mut cache = WindowCache::new();

        for (index, segment) in segments.iter().enumerate() {
            if cursor > len {
                return Err(AlignError::CursorOverrun { cursor, len });
            }
            if segment.script.is_empty() {
                return Err(AlignError::InvalidSegment { index });
            }

            let is_last = index + 1 == segments.len();
            let script_len = segment.script.chars().count();
            let script_tokens = tokenize(&segment.script);

            let (end, exact, similarity) = if self.text.starts_with_at(cursor, &segment.script) {
                self.exact_match(cursor, script_len, &script_tokens)
            } else {
                let best = self.fuzzy_search(&mut cache, cursor, script_len, &script_tokens);
                match best {
                    Some(best) if best.similarity >= self.params.fuzzy_threshold || is_last => {
                        let end = if is_last && best.end < len {
                            log::debug!(
                                "Segment {}: closing last span from {} to {}",
                                index,
                                best.end,
                                len
                            );
                            len
                        } else {
                            best.end
                        };
                        if best.similarity < self.params.fuzzy_threshold {
                            log::warn!(
                                "Segment {}: last segment accepted below threshold ({:.3} < {:.3})",
                                index,
                                best.similarity,
                                self.params.fuzzy_threshold
                            );
                        }
                        (end, false, best.similarity)
                    }
                    None if is_last => {
                        log::warn!(
                            "Segment {}: no fuzzy candidate, closing remaining {} characters",
                            index,
                            len - cursor
                        );
                        (len, false, 0.0)
                    }
                    other => {
                        return Err(AlignError::NoFuzzyMatch {
                            index,
                            label: segment.label(),
                            best_similarity: other.map_or(0.0, |c| c.similarity),
                        });
                    }
                }
            };

            log::debug!(
                "Segment {}: [{}, {}) exact={} similarity={:.3}",
                index,
                cursor,
                end,
                exact,
                similarity
            );

            spans.push(AlignmentSpan {
                segment: segment.clone(),
                start: cursor,
                end,
                matched_text: self.text.slice(cursor, end).to_string(),
                exact,
                similarity,
            });
            cursor = end;
        }

        if cursor != len {
            return Err(AlignError::IncompleteReconstruction {
                remaining: len.saturating_sub(cursor),
            });
        }

        Ok(spans)
    }

    /// Span for a literal prefix match, snapped by the strategy.
    ///
    /// Exact only when snapping did not move the end; otherwise the snapped
    /// span is rescored against the script.
    fn exact_match(&self, cursor: usize, script_len: usize, script_tokens: &TokenSet) -> (usize, bool, f64) {
        let script_end = cursor + script_len;
        let end = self
            .strategy
            .snap_exact(cursor, script_end)
            .min(self.text.char_len());

        if end == script_end {
            return (end, true, 1.0);
        }

        let snapped = tokenize(self.text.slice(cursor, end));
        (end, false, similarity_ratio(script_tokens, &snapped))
    }

    /// Highest-scoring candidate window at `cursor`, ties going to the
    /// shortest. `None` when the script has no tokens or no text remains.
    fn fuzzy_search(
        &self,
        cache: &mut WindowCache,
        cursor: usize,
        script_len: usize,
        script_tokens: &TokenSet,
    ) -> Option<FuzzyCandidate> {
        let len = self.text.char_len();
        let remaining = len.saturating_sub(cursor);
        if remaining == 0 || script_tokens.is_empty() {
            return None;
        }

        let limits = WindowLimits::new(
            script_len,
            remaining,
            self.params.max_contraction,
            self.params.max_expansion,
        );

        let mut best: Option<FuzzyCandidate> = None;

        for end in self.strategy.candidate_ends(cursor, limits) {
            let end = end.min(len);
            if end <= cursor {
                continue;
            }

            let window = cache.tokens(self.text, cursor, end - cursor);
            let similarity = similarity_ratio(script_tokens, window);
            log::trace!("  window [{}, {}) similarity={:.3}", cursor, end, similarity);

            if best.map_or(true, |b| similarity > b.similarity) {
                best = Some(FuzzyCandidate { end, similarity });
            }
            // Nothing can beat a full score, and ties keep the earlier end
            if similarity >= 1.0 {
                break;
            }
        }

        best
    }
}
