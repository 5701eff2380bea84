//! Token-overlap similarity between a segment and a candidate window.

use crate::tokenize::TokenSet;

/// Containment ratio of `candidate` inside `window`.
///
/// Sums `min(count_candidate[t], count_window[t])` over the candidate's
/// distinct tokens and divides by the candidate's token count. Extra tokens in
/// the window cost nothing, so a window larger than the segment still scores 1
/// when it contains every candidate token. Returns 0 for an empty candidate.
pub fn similarity_ratio(candidate: &TokenSet, window: &TokenSet) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }

    let overlap: usize = candidate
        .counts
        .iter()
        .map(|(token, &count)| count.min(window.count(token)))
        .sum();

    overlap as f64 / candidate.len().max(1) as f64
}
