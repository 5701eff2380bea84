//! Output formatting for alignment results (views, JSON, CSV, console).

use crate::models::{AlignmentSpan, AlignmentSummary, BatchReport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shape of the rendered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// All span fields plus the summary
    #[default]
    Detailed,
    /// Matched text only
    Compact,
    /// Statistics and reconstruction status only
    Summary,
}

/// Render spans into the JSON view selected by `mode`.
pub fn render_view(spans: &[AlignmentSpan], master_text: &str, mode: OutputMode) -> Result<Value, OutputError> {
    let summary = AlignmentSummary::from_spans(spans, master_text);

    let value = match mode {
        OutputMode::Summary => json!({ "summary": summary }),
        OutputMode::Compact => {
            let results: Vec<Value> = spans
                .iter()
                .map(|span| json!({ "text": span.matched_text }))
                .collect();
            json!({ "results": results })
        }
        OutputMode::Detailed => json!({
            "results": serde_json::to_value(spans)?,
            "summary": summary,
        }),
    };

    Ok(value)
}

/// Write a JSON value, pretty-printed.
pub fn write_json<W: Write, T: Serialize>(value: &T, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    writer.write_all(json.as_bytes())?;
    writeln!(writer)?;
    Ok(())
}

/// Write a JSON value to a file.
pub fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(value, &mut file)
}

/// Write spans as CSV, one row per span.
pub fn write_csv<W: Write>(spans: &[AlignmentSpan], writer: &mut W) -> Result<(), OutputError> {
    writeln!(writer, "index,title,start,end,length,exact,similarity,matched_text")?;

    for (index, span) in spans.iter().enumerate() {
        writeln!(
            writer,
            "{},{:?},{},{},{},{},{:.4},{:?}",
            index,
            span.segment.title.as_deref().unwrap_or(""),
            span.start,
            span.end,
            span.len(),
            span.exact,
            span.similarity,
            span.matched_text
        )?;
    }

    Ok(())
}

/// Write spans as CSV to a file.
pub fn write_csv_file(spans: &[AlignmentSpan], path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_csv(spans, &mut file)
}

/// Print the alignment summary to stdout.
pub fn print_summary(summary: &AlignmentSummary) {
    println!("\n=== Alignment Summary ===");
    println!(
        "Fully reconstructed: {}",
        if summary.fully_reconstructed { "yes" } else { "NO" }
    );
    println!("Total segments: {}", summary.total_segments);
    println!("Exact matches: {}", summary.exact_matches);
    println!("Fuzzy matches: {}", summary.fuzzy_matches);
    println!("Average similarity: {:.3}", summary.avg_similarity);
}

/// Format a span as a human-readable string.
pub fn format_span(index: usize, span: &AlignmentSpan, fuzzy_threshold: f64, is_last: bool) -> String {
    let match_type = if span.exact { "EXACT" } else { "FUZZY" };
    let threshold_note = if span.exact || span.similarity >= fuzzy_threshold {
        ""
    } else if is_last {
        " (below threshold, last segment)"
    } else {
        " (below threshold)"
    };

    format!(
        "Segment {}: {} [{}]\n\
         \x20 Similarity: {:.3} / {}{}\n\
         \x20 Position: [{}, {}) ({} chars)\n\
         \x20 Script:  {:?}\n\
         \x20 Matched: {:?}",
        index + 1,
        span.segment.title.as_deref().unwrap_or("Untitled"),
        match_type,
        span.similarity,
        fuzzy_threshold,
        threshold_note,
        span.start,
        span.end,
        span.len(),
        truncate_text(&span.segment.script, 80),
        truncate_text(&span.matched_text, 80),
    )
}

/// Print spans in a human-readable format.
pub fn print_spans(spans: &[AlignmentSpan], fuzzy_threshold: f64, limit: Option<usize>) {
    let to_print = match limit {
        Some(n) => &spans[..n.min(spans.len())],
        None => spans,
    };

    for (index, span) in to_print.iter().enumerate() {
        println!("{}\n", format_span(index, span, fuzzy_threshold, index + 1 == spans.len()));
    }

    if let Some(n) = limit {
        if spans.len() > n {
            println!("... and {} more spans", spans.len() - n);
        }
    }
}

/// Print totals for a batch run.
pub fn print_batch_summary(report: &BatchReport) {
    println!("\n=== Batch Summary ===");
    println!("Version: {}", report.version);
    println!("Jobs: {}", report.job_count);
    println!("Succeeded: {}", report.succeeded);
    println!("Failed: {}", report.failed);

    for outcome in report.outcomes.iter().filter(|o| !o.is_ok()) {
        println!(
            "  {}: {}",
            outcome.id.as_deref().unwrap_or("-"),
            outcome.error.as_deref().unwrap_or("")
        );
    }
}

/// Truncate text to a maximum length, adding ellipsis if needed.
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
