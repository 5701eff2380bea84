//! Data structures for the segment alignment pipeline.

use serde::{Deserialize, Serialize};

/// A caller-supplied fragment to locate inside the master text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub script: String,
}

impl Segment {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            title: None,
            script: script.into(),
        }
    }

    pub fn titled(title: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            script: script.into(),
        }
    }

    /// Title if present, otherwise the first 30 characters of the script.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => self.script.chars().take(30).collect(),
        }
    }
}

/// One output span: the part of the master text assigned to a segment.
///
/// `start` and `end` are char offsets into the master text, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentSpan {
    #[serde(flatten)]
    pub segment: Segment,
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    pub exact: bool,
    pub similarity: f64,
}

impl AlignmentSpan {
    /// Length of the span in chars.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A `[start, end)` range of char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub start: usize,
    pub end: usize,
}

impl Bounds {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }
}

/// Granularity of legal window ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Windows end on sentence boundaries (default)
    #[default]
    Sentence,
    /// Windows may end at any char offset
    Word,
}

/// Which sentence boundary provider to use in sentence mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    /// Unicode provider when compiled in, punctuation scan otherwise
    #[default]
    Auto,
    /// UAX #29 sentence boundaries
    Unicode,
    /// Terminal punctuation scan
    Punctuation,
}

/// Alignment parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParams {
    pub fuzzy_threshold: f64,
    pub max_expansion: usize,    // chars a fuzzy window may grow past the script length
    pub max_contraction: f64,    // fraction a fuzzy window may shrink, in [0, 1)
    pub boundary_mode: BoundaryMode,
    pub splitter: SplitterKind,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.6,
            max_expansion: 200,
            max_contraction: 0.4,
            boundary_mode: BoundaryMode::Sentence,
            splitter: SplitterKind::Auto,
        }
    }
}

impl AlignmentParams {
    /// Check parameter ranges. Returns a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if !self.fuzzy_threshold.is_finite() || !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(format!(
                "fuzzy_threshold must be within [0, 1], got {}",
                self.fuzzy_threshold
            ));
        }
        if !self.max_contraction.is_finite() || !(0.0..1.0).contains(&self.max_contraction) {
            return Err(format!(
                "max_contraction must be within [0, 1), got {}",
                self.max_contraction
            ));
        }
        Ok(())
    }
}

/// Aggregate statistics over one alignment result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentSummary {
    pub total_segments: usize,
    pub exact_matches: usize,
    pub fuzzy_matches: usize,
    pub avg_similarity: f64,
    pub fully_reconstructed: bool,
}

impl AlignmentSummary {
    pub fn from_spans(spans: &[AlignmentSpan], master_text: &str) -> Self {
        let exact_matches = spans.iter().filter(|s| s.exact).count();
        let avg_similarity = if spans.is_empty() {
            0.0
        } else {
            spans.iter().map(|s| s.similarity).sum::<f64>() / spans.len() as f64
        };
        let reconstructed: String = spans.iter().map(|s| s.matched_text.as_str()).collect();

        AlignmentSummary {
            total_segments: spans.len(),
            exact_matches,
            fuzzy_matches: spans.len() - exact_matches,
            avg_similarity,
            fully_reconstructed: reconstructed == master_text,
        }
    }
}

// ============================================================================
// Batch records
// ============================================================================

/// One independent alignment request in a batch file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentJob {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    pub segments: Vec<Segment>,
    /// Overrides the batch-wide parameters for this job only
    #[serde(default)]
    pub params: Option<AlignmentParams>,
}

/// Result of one batch job: spans and summary on success, the error otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<AlignmentSpan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<AlignmentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Totals across a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub version: String,
    pub job_count: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<JobOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, text: &str, exact: bool, similarity: f64) -> AlignmentSpan {
        AlignmentSpan {
            segment: Segment::new(text),
            start,
            end,
            matched_text: text.to_string(),
            exact,
            similarity,
        }
    }

    #[test]
    fn test_default_params() {
        let params = AlignmentParams::default();
        assert_eq!(params.fuzzy_threshold, 0.6);
        assert_eq!(params.max_expansion, 200);
        assert_eq!(params.max_contraction, 0.4);
        assert_eq!(params.boundary_mode, BoundaryMode::Sentence);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let params = AlignmentParams {
            max_contraction: 1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = AlignmentParams {
            fuzzy_threshold: 1.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = AlignmentParams {
            fuzzy_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_params_partial_deserialize() {
        let params: AlignmentParams =
            serde_json::from_str(r#"{"fuzzy_threshold": 0.5, "boundary_mode": "word"}"#).unwrap();
        assert_eq!(params.fuzzy_threshold, 0.5);
        assert_eq!(params.boundary_mode, BoundaryMode::Word);
        assert_eq!(params.max_expansion, 200);
    }

    #[test]
    fn test_segment_label() {
        assert_eq!(Segment::titled("Intro", "abc").label(), "Intro");
        let long = Segment::new("a".repeat(50));
        assert_eq!(long.label().chars().count(), 30);
    }

    #[test]
    fn test_span_serializes_flat_camel_case() {
        let json = serde_json::to_value(span(0, 3, "abc", true, 1.0)).unwrap();
        assert_eq!(json["script"], "abc");
        assert_eq!(json["matchedText"], "abc");
        assert!(json.get("title").is_none());
        assert!(json.get("segment").is_none());
    }

    #[test]
    fn test_summary_counts() {
        let spans = vec![span(0, 3, "abc", true, 1.0), span(3, 6, "def", false, 0.5)];
        let summary = AlignmentSummary::from_spans(&spans, "abcdef");
        assert_eq!(summary.total_segments, 2);
        assert_eq!(summary.exact_matches, 1);
        assert_eq!(summary.fuzzy_matches, 1);
        assert!((summary.avg_similarity - 0.75).abs() < 1e-9);
        assert!(summary.fully_reconstructed);

        let summary = AlignmentSummary::from_spans(&spans, "abcdefg");
        assert!(!summary.fully_reconstructed);
    }

    #[test]
    fn test_summary_empty() {
        let summary = AlignmentSummary::from_spans(&[], "");
        assert_eq!(summary.total_segments, 0);
        assert_eq!(summary.avg_similarity, 0.0);
        assert!(summary.fully_reconstructed);
    }
}
