//! Segment Aligner command-line interface.
//!
//! Aligns ordered text fragments onto a master document and writes the
//! resulting spans in detailed, compact or summary form.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use segment_aligner::align::align;
use segment_aligner::batch::{align_jobs, load_jobs};
use segment_aligner::boundary::{resolve_splitter, SentenceBoundaries};
use segment_aligner::config::{resolve_params, ParamOverrides};
use segment_aligner::models::{AlignmentParams, AlignmentSummary, BoundaryMode, Segment, SplitterKind};
use segment_aligner::output::{
    print_batch_summary, print_spans, print_summary, render_view, write_csv, write_csv_file,
    write_json, write_json_file, OutputMode,
};
use segment_aligner::text::MasterText;

#[derive(Parser)]
#[command(name = "segment-aligner")]
#[command(about = "Align ordered text fragments onto a master document")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// File format for alignment results
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// JSON view selected by --mode
    Json,
    /// CSV, one row per span
    Csv,
}

/// Output view (CLI version, mirrors output::OutputMode)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliOutputMode {
    /// Includes similarity, positions, and match type
    Detailed,
    /// Outputs only aligned texts
    Compact,
    /// Outputs statistics and reconstruction status only
    Summary,
}

impl From<CliOutputMode> for OutputMode {
    fn from(mode: CliOutputMode) -> Self {
        match mode {
            CliOutputMode::Detailed => OutputMode::Detailed,
            CliOutputMode::Compact => OutputMode::Compact,
            CliOutputMode::Summary => OutputMode::Summary,
        }
    }
}

/// Boundary granularity (CLI version, mirrors models::BoundaryMode)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliBoundaryMode {
    /// Windows end on sentence boundaries
    Sentence,
    /// Windows may end at any character
    Word,
}

impl From<CliBoundaryMode> for BoundaryMode {
    fn from(mode: CliBoundaryMode) -> Self {
        match mode {
            CliBoundaryMode::Sentence => BoundaryMode::Sentence,
            CliBoundaryMode::Word => BoundaryMode::Word,
        }
    }
}

/// Sentence boundary provider (CLI version, mirrors models::SplitterKind)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliSplitter {
    /// Unicode rules when available, punctuation scan otherwise
    Auto,
    /// Unicode (UAX #29) sentence rules
    Unicode,
    /// Terminal punctuation scan
    Punctuation,
}

impl From<CliSplitter> for SplitterKind {
    fn from(kind: CliSplitter) -> Self {
        match kind {
            CliSplitter::Auto => SplitterKind::Auto,
            CliSplitter::Unicode => SplitterKind::Unicode,
            CliSplitter::Punctuation => SplitterKind::Punctuation,
        }
    }
}

/// Parameters shared by `align` and `batch`. Every field defaults to
/// `AlignmentParams::default()` (or the --config file) when omitted.
#[derive(clap::Args, Debug)]
struct ParamArgs {
    /// Parameter file (TOML, or JSON by extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum similarity for a fuzzy match (0-1) [default: 0.6]
    #[arg(long)]
    fuzzy_threshold: Option<f64>,

    /// Characters a fuzzy window may grow past the segment length [default: 200]
    #[arg(long)]
    max_expansion: Option<usize>,

    /// Fraction a fuzzy window may shrink below the segment length [default: 0.4]
    #[arg(long)]
    max_contraction: Option<f64>,

    /// Where match windows may end [default: sentence]
    #[arg(long, value_enum)]
    boundary_mode: Option<CliBoundaryMode>,

    /// Sentence boundary provider [default: auto]
    #[arg(long, value_enum)]
    splitter: Option<CliSplitter>,
}

impl ParamArgs {
    fn resolve(&self) -> Result<AlignmentParams, segment_aligner::config::ConfigError> {
        let overrides = ParamOverrides {
            fuzzy_threshold: self.fuzzy_threshold,
            max_expansion: self.max_expansion,
            max_contraction: self.max_contraction,
            boundary_mode: self.boundary_mode.map(BoundaryMode::from),
            splitter: self.splitter.map(SplitterKind::from),
        };
        resolve_params(self.config.as_deref(), &overrides)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Align segments onto a master text
    Align {
        /// Master text file ("-" for stdin)
        #[arg(long)]
        text: PathBuf,

        /// JSON file with an array of {"title"?, "script"} segments
        #[arg(long)]
        segments: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Output view
        #[arg(long, value_enum, default_value = "detailed")]
        mode: CliOutputMode,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output file path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print first N spans to console
        #[arg(long)]
        show_spans: Option<usize>,

        /// Suppress progress and summary output
        #[arg(long)]
        quiet: bool,
    },

    /// Align many independent jobs in parallel
    Batch {
        /// JSON file with an array of {"id"?, "text", "segments", "params"?} jobs
        #[arg(long)]
        jobs: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Output file path for the batch report (JSON)
        #[arg(long)]
        output: PathBuf,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// Show the sentence boundaries computed for a text
    Boundaries {
        /// Master text file ("-" for stdin)
        #[arg(long)]
        text: PathBuf,

        /// Sentence boundary provider
        #[arg(long, value_enum, default_value = "auto")]
        splitter: CliSplitter,
    },

    /// Benchmark alignment performance
    Benchmark {
        /// Number of alignment iterations
        #[arg(long, default_value = "100")]
        iterations: usize,

        /// Number of sentences in the synthetic document
        #[arg(long, default_value = "200")]
        size: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Align {
            text,
            segments,
            params,
            mode,
            format,
            output,
            show_spans,
            quiet,
        } => {
            let params = params.resolve()?;
            let master_text = read_text(&text)?;
            let segments: Vec<Segment> = serde_json::from_str(&std::fs::read_to_string(&segments)?)?;

            if !quiet {
                eprintln!(
                    "Aligning {} segments onto {} characters ({:?} mode)...",
                    segments.len(),
                    master_text.chars().count(),
                    params.boundary_mode
                );
            }

            let spans = align(&master_text, &segments, &params)?;

            match (format, &output) {
                (OutputFormat::Json, Some(path)) => {
                    write_json_file(&render_view(&spans, &master_text, mode.into())?, path)?;
                }
                (OutputFormat::Json, None) => {
                    write_json(&render_view(&spans, &master_text, mode.into())?, &mut io::stdout().lock())?;
                }
                (OutputFormat::Csv, Some(path)) => write_csv_file(&spans, path)?,
                (OutputFormat::Csv, None) => write_csv(&spans, &mut io::stdout().lock())?,
            }

            if let Some(limit) = show_spans {
                println!("\n=== Spans ===");
                print_spans(&spans, params.fuzzy_threshold, Some(limit));
            }

            if !quiet && output.is_some() {
                print_summary(&AlignmentSummary::from_spans(&spans, &master_text));
                if let Some(path) = &output {
                    eprintln!("\nOutput: {}", path.display());
                }
            }
        }

        Commands::Batch {
            jobs,
            params,
            output,
            quiet,
        } => {
            let defaults = params.resolve()?;
            let jobs = load_jobs(&jobs)?;

            let report = align_jobs(&jobs, &defaults, !quiet);
            write_json_file(&report, &output)?;

            if !quiet {
                print_batch_summary(&report);
                eprintln!("\nOutput: {}", output.display());
            }
        }

        Commands::Boundaries { text, splitter } => {
            let content = read_text(&text)?;
            let master = MasterText::new(&content);
            let splitter = resolve_splitter(splitter.into());
            let boundaries = SentenceBoundaries::compute(&master, splitter.as_ref());

            println!("=== Sentence Boundaries ({}) ===", splitter.name());
            for (i, bounds) in boundaries.spans().iter().enumerate() {
                println!(
                    "{:>4} [{}, {}) {:?}",
                    i,
                    bounds.start,
                    bounds.end,
                    master.slice(bounds.start, bounds.end)
                );
            }
        }

        Commands::Benchmark { iterations, size } => {
            run_benchmark(iterations, size)?;
        }
    }

    Ok(())
}

/// Initialize logging from the -v count; RUST_LOG still wins when set.
fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Read a text file, or stdin for "-".
fn read_text(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Run alignment benchmark to measure performance.
fn run_benchmark(iterations: usize, size: usize) -> Result<(), Box<dyn std::error::Error>> {
    use std::time::Instant;

    println!("=== Alignment Benchmark ===");
    println!("Iterations: {}", iterations);
    println!("Sentences: {}", size);

    let sentences: Vec<String> = (0..size)
        .map(|i| format!("Sentence number {} talks about topic {} at length. ", i, i % 17))
        .collect();
    let text: String = sentences.concat();

    // Paraphrased segments, four sentences each
    let segments: Vec<Segment> = sentences
        .chunks(4)
        .map(|chunk| Segment::new(chunk.concat().replace("talks", "speaks").trim_end().to_string()))
        .collect();

    for mode in [BoundaryMode::Sentence, BoundaryMode::Word] {
        let params = AlignmentParams {
            boundary_mode: mode,
            ..Default::default()
        };

        println!("\n{:?} mode:", mode);
        let start = Instant::now();
        for _ in 0..iterations {
            align(&text, &segments, &params)?;
        }
        let elapsed = start.elapsed();
        let per_alignment = elapsed.as_secs_f64() / iterations.max(1) as f64;
        println!("  Total time: {:.3}s", elapsed.as_secs_f64());
        println!("  Per alignment: {:.3}ms", per_alignment * 1000.0);
        println!("  Alignments/sec: {:.0}", 1.0 / per_alignment.max(f64::EPSILON));
    }

    Ok(())
}
