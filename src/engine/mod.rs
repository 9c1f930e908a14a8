//! The three stages a run passes through: path validation, pipeline invocation
//! and artifact collection. Each stage is usable on its own; sequencing lives in
//! the orchestrator.

mod collect;
mod invoke;
mod validate;

pub use collect::ResultCollector;
pub use invoke::{PipelineInvoker, ScriptInvoker};
pub use validate::PathValidator;

use crate::error::ValidationError;
use crate::model::RunConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One positional argument slot of the pipeline command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineArg {
    Workdir,
    ReferenceIndex,
    Fastq,
    Annotations,
    StrandSpecificity,
}

/// Contract with the external pipeline: what to run, how to pass the inputs,
/// and where the count table is expected afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSpec {
    pub command: PathBuf,
    pub args: Vec<PipelineArg>,
    /// Artifact location relative to the run's working directory.
    pub output: PathBuf,
}

impl Default for PipelineSpec {
    fn default() -> Self {
        Self {
            command: PathBuf::from("./pipeline.sh"),
            args: vec![
                PipelineArg::Workdir,
                PipelineArg::ReferenceIndex,
                PipelineArg::Fastq,
                PipelineArg::Annotations,
                PipelineArg::StrandSpecificity,
            ],
            output: Path::new("data").join("feature_counts.txt"),
        }
    }
}

impl PipelineSpec {
    pub fn with_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = command.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Positional arguments for `cfg`, in contract order. Values are passed through unescaped.
    pub fn render_args(&self, cfg: &RunConfig) -> Result<Vec<OsString>, ValidationError> {
        let strand = cfg.strand()?;
        Ok(self
            .args
            .iter()
            .map(|arg| match arg {
                PipelineArg::Workdir => OsString::from(&cfg.workdir),
                PipelineArg::ReferenceIndex => OsString::from(&cfg.reference_index),
                PipelineArg::Fastq => OsString::from(&cfg.fastq_path),
                PipelineArg::Annotations => OsString::from(&cfg.annotations_path),
                PipelineArg::StrandSpecificity => OsString::from(strand.as_token()),
            })
            .collect())
    }
}
