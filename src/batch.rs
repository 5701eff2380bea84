//! Batch orchestration: many independent alignment jobs in parallel.
//!
//! Each job is a pure call into [`crate::align::align`] with its own text,
//! segments and cache, so jobs share nothing and run on the rayon pool.
//! Outcomes keep the input order; a failed job is reported, not fatal.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::align::align;
use crate::models::{AlignmentJob, AlignmentParams, AlignmentSummary, BatchReport, JobOutcome};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load jobs from a JSON array file.
pub fn load_jobs(path: &Path) -> Result<Vec<AlignmentJob>, BatchError> {
    let content = std::fs::read_to_string(path)?;
    parse_jobs(&content)
}

pub fn parse_jobs(content: &str) -> Result<Vec<AlignmentJob>, BatchError> {
    Ok(serde_json::from_str(content)?)
}

/// Run one job, using its own parameters when present.
pub fn run_job(job: &AlignmentJob, defaults: &AlignmentParams) -> JobOutcome {
    let params = job.params.as_ref().unwrap_or(defaults);

    match align(&job.text, &job.segments, params) {
        Ok(spans) => {
            let summary = AlignmentSummary::from_spans(&spans, &job.text);
            JobOutcome {
                id: job.id.clone(),
                results: Some(spans),
                summary: Some(summary),
                error: None,
            }
        }
        Err(err) => {
            log::warn!("Job {}: {}", job.id.as_deref().unwrap_or("-"), err);
            JobOutcome {
                id: job.id.clone(),
                results: None,
                summary: None,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Align all jobs in parallel.
pub fn align_jobs(jobs: &[AlignmentJob], defaults: &AlignmentParams, show_progress: bool) -> BatchReport {
    if show_progress {
        eprintln!("Aligning {} jobs...", jobs.len());
    }

    let progress = if show_progress {
        let pb = ProgressBar::new(jobs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let outcomes: Vec<JobOutcome> = jobs
        .par_iter()
        .map(|job| {
            let outcome = run_job(job, defaults);
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            outcome
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();

    BatchReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        job_count: outcomes.len(),
        succeeded,
        failed: outcomes.len() - succeeded,
        outcomes,
    }
}
