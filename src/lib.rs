//! Segment Aligner Library
//!
//! Locates an ordered sequence of text fragments ("segments") inside one
//! master text and partitions the master text into contiguous spans, one per
//! segment, that concatenate back into it exactly. Each span is tagged as an
//! exact or fuzzy (token-overlap) match with a similarity score.
//!
//! # Example
//!
//! ```
//! use segment_aligner::prelude::*;
//!
//! let text = "Hello world. Goodbye world.";
//! let segments = vec![Segment::new("Hello world. "), Segment::new("Goodbye world.")];
//! let params = AlignmentParams {
//!     boundary_mode: BoundaryMode::Word,
//!     ..Default::default()
//! };
//!
//! let spans = align(text, &segments, &params).unwrap();
//!
//! assert_eq!(spans.len(), 2);
//! assert!(spans.iter().all(|span| span.exact));
//! assert_eq!(spans[1].end, text.chars().count());
//! ```
//!
//! # Output Views
//!
//! ```
//! use segment_aligner::prelude::*;
//!
//! let text = "One fish. Two fish.";
//! let segments = vec![Segment::new("One fish. "), Segment::new("Two fishes.")];
//! let spans = align(text, &segments, &AlignmentParams::default()).unwrap();
//!
//! let view = render_view(&spans, text, OutputMode::Summary).unwrap();
//! assert_eq!(view["summary"]["fullyReconstructed"], true);
//! ```

pub mod align;
pub mod batch;
pub mod boundary;
pub mod config;
pub mod models;
pub mod output;
pub mod similarity;
pub mod text;
pub mod tokenize;
pub mod window;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::align::{align, AlignError, Aligner};
    pub use crate::batch::{align_jobs, load_jobs, parse_jobs, run_job, BatchError};
    pub use crate::boundary::{
        resolve_splitter, PunctuationSplitter, SentenceBoundaries, SentenceSplitter,
    };
    #[cfg(feature = "unicode-sentences")]
    pub use crate::boundary::UnicodeSentenceSplitter;
    pub use crate::config::{load_params, resolve_params, ConfigError, ParamOverrides};
    pub use crate::models::{
        AlignmentJob, AlignmentParams, AlignmentSpan, AlignmentSummary, BatchReport,
        BoundaryMode, Bounds, JobOutcome, Segment, SplitterKind,
    };
    pub use crate::output::{
        format_span, print_batch_summary, print_spans, print_summary, render_view, write_csv,
        write_csv_file, write_json, write_json_file, OutputError, OutputMode,
    };
    pub use crate::similarity::similarity_ratio;
    pub use crate::text::MasterText;
    pub use crate::tokenize::{normalize_token, tokenize, TokenSet};
    pub use crate::window::{
        CharacterWindows, SentenceWindows, WindowCache, WindowLimits, WindowStrategy,
    };
}

// Re-export commonly used types at the crate root
pub use align::{align, AlignError};
pub use models::{AlignmentParams, AlignmentSpan, BoundaryMode, Segment};
