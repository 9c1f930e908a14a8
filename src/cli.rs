use crate::engine::PipelineSpec;
use crate::model::{RunConfig, RunEvent, RunResult, RunState, StrandSpecificity};
use crate::orchestrator::{build_report, save_artifact, RunCoordinator};
use anyhow::{Context, Result};
use clap::Parser;
use rand::RngCore;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "geneflow",
    version,
    about = "Run an RNA-Seq alignment and feature-counting pipeline and collect its gene counts"
)]
pub struct Cli {
    /// Directory where the analysis takes place
    #[arg(long)]
    pub workdir: Option<String>,

    /// Path to the reference genome index (e.g., hg38)
    #[arg(long)]
    pub reference_index: Option<String>,

    /// Path to the input FASTQ file
    #[arg(long)]
    pub fastq: Option<String>,

    /// Path to the gene annotation file
    #[arg(long)]
    pub annotations: Option<String>,

    /// Strand specificity of the RNA-Seq library
    #[arg(long, value_enum)]
    pub strand: Option<StrandSpecificity>,

    /// Load run inputs from a JSON file; flags override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pipeline executable invoked with the five run inputs
    #[arg(long, default_value = "./pipeline.sh")]
    pub pipeline: PathBuf,

    /// Location of the count table relative to the working directory
    #[arg(long, default_value = "data/feature_counts.txt")]
    pub counts_path: PathBuf,

    /// Copy the gene count table to this file or directory after a successful run
    #[arg(long)]
    pub download: Option<PathBuf>,

    /// Print JSON report instead of the text summary
    #[arg(long)]
    pub json: bool,

    /// Run silently: suppress all output except the error message
    #[arg(long)]
    pub silent: bool,
}

/// Generate a random identifier used to correlate log lines of one run.
fn gen_run_id() -> String {
    let mut b = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut b);
    format!("{:016x}", u64::from_le_bytes(b))
}

fn load_config(path: &Path) -> Result<RunConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read run config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse run config {}", path.display()))
}

/// Build a `RunConfig` from CLI arguments, layered over `--config` when given.
///
/// Fields nobody supplied stay blank; the validator reports them.
pub fn build_config(args: &Cli) -> Result<RunConfig> {
    let mut cfg = match args.config.as_deref() {
        Some(p) => load_config(p)?,
        None => RunConfig::default(),
    };
    if let Some(v) = &args.workdir {
        cfg.workdir = v.clone();
    }
    if let Some(v) = &args.reference_index {
        cfg.reference_index = v.clone();
    }
    if let Some(v) = &args.fastq {
        cfg.fastq_path = v.clone();
    }
    if let Some(v) = &args.annotations {
        cfg.annotations_path = v.clone();
    }
    if let Some(s) = args.strand {
        cfg.strand_specificity = s.as_token().to_string();
    }
    Ok(cfg)
}

pub fn build_spec(args: &Cli) -> PipelineSpec {
    PipelineSpec::default()
        .with_command(&args.pipeline)
        .with_output(&args.counts_path)
}

/// Run one analysis and report it. Returns the terminal state of the run.
pub async fn run(args: Cli) -> Result<RunState> {
    let cfg = build_config(&args)?;
    let spec = build_spec(&args);
    let run_id = gen_run_id();
    let show_progress = !args.silent && !args.json;

    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<RunEvent>();

    let started = Instant::now();
    let span = tracing::info_span!("run", run_id = %run_id);
    let handle = tokio::task::spawn_blocking(move || {
        span.in_scope(|| RunCoordinator::new(spec).with_events(evt_tx).run(&cfg))
    });

    // The channel closes when the coordinator is dropped at the end of the run.
    while let Some(ev) = evt_rx.recv().await {
        if !show_progress {
            continue;
        }
        match ev {
            RunEvent::StateChanged { state } if !state.is_terminal() => {
                let _ = out_tx.send(OutputLine::Stderr(format!("== {state:?} ==")));
            }
            RunEvent::StateChanged { .. } => {}
            RunEvent::Info(msg) => {
                let _ = out_tx.send(OutputLine::Stderr(msg));
            }
        }
    }

    let result = handle.await.context("run task failed")?;
    let elapsed = started.elapsed();
    let state = result.state();

    if let (Some(dest), Some(artifact)) = (args.download.as_deref(), result.artifact()) {
        let saved = save_artifact(artifact, dest)?;
        if show_progress {
            let _ = out_tx.send(OutputLine::Stderr(format!("Saved: {}", saved.display())));
        }
    }

    if args.json {
        let report = build_report(&run_id, elapsed, &result);
        let out = serde_json::to_string_pretty(&report).context("encode run report")?;
        let _ = out_tx.send(OutputLine::Stdout(out));
    } else if args.silent {
        if let RunResult::Failed(e) = &result {
            let _ = out_tx.send(OutputLine::Stdout(e.to_string()));
        }
    } else {
        let summary = crate::text_summary::build_text_summary(&result, elapsed);
        for line in summary.lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }

    drop(out_tx);
    let _ = out_handle.await;
    Ok(state)
}
