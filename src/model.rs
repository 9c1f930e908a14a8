use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ValidationError;

/// Operator-supplied inputs for one analysis run.
///
/// Every field is required. Values stay as raw strings until the validator
/// has looked at them, so a blank field is reported as a configuration error
/// instead of being rejected by the argument parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default)]
    pub workdir: String,
    #[serde(default)]
    pub reference_index: String,
    #[serde(default)]
    pub fastq_path: String,
    #[serde(default)]
    pub annotations_path: String,
    #[serde(default)]
    pub strand_specificity: String,
}

impl RunConfig {
    pub fn value(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::Workdir => &self.workdir,
            ConfigField::ReferenceIndex => &self.reference_index,
            ConfigField::Fastq => &self.fastq_path,
            ConfigField::Annotations => &self.annotations_path,
            ConfigField::StrandSpecificity => &self.strand_specificity,
        }
    }

    pub fn workdir(&self) -> &Path {
        Path::new(&self.workdir)
    }

    /// Parse the strand token. Only the three literal tokens are accepted.
    pub fn strand(&self) -> Result<StrandSpecificity, ValidationError> {
        self.strand_specificity.parse()
    }
}

/// Names the `RunConfig` field a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    Workdir,
    ReferenceIndex,
    Fastq,
    Annotations,
    StrandSpecificity,
}

impl ConfigField {
    /// Human-readable label used in operator-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            ConfigField::Workdir => "Working directory",
            ConfigField::ReferenceIndex => "Reference index directory",
            ConfigField::Fastq => "FASTQ file",
            ConfigField::Annotations => "Annotations file",
            ConfigField::StrandSpecificity => "Strand specificity",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigField::Workdir => "workdir",
            ConfigField::ReferenceIndex => "referenceIndex",
            ConfigField::Fastq => "fastqPath",
            ConfigField::Annotations => "annotationsPath",
            ConfigField::StrandSpecificity => "strandSpecificity",
        };
        f.write_str(name)
    }
}

/// Strandedness of the sequencing library, passed to the pipeline as a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum StrandSpecificity {
    #[value(name = "None")]
    None,
    #[value(name = "RF")]
    RF,
    #[value(name = "FR")]
    FR,
}

impl StrandSpecificity {
    pub fn as_token(self) -> &'static str {
        match self {
            StrandSpecificity::None => "None",
            StrandSpecificity::RF => "RF",
            StrandSpecificity::FR => "FR",
        }
    }
}

impl FromStr for StrandSpecificity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(StrandSpecificity::None),
            "RF" => Ok(StrandSpecificity::RF),
            "FR" => Ok(StrandSpecificity::FR),
            "" => Err(ValidationError::Blank {
                field: ConfigField::StrandSpecificity,
            }),
            other => Err(ValidationError::UnknownStrand {
                token: other.to_string(),
            }),
        }
    }
}

/// Outcome of the single pre-flight check of a `RunConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Captured result of one external pipeline process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The feature count table produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: Bytes,
}

impl Artifact {
    /// Text rendering for display. Invalid UTF-8 is replaced, the bytes are untouched.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.contents
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("feature_counts.txt")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Validating,
    Invoking,
    Collecting,
    Succeeded,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed)
    }
}

/// Events emitted by the coordinator and consumed by CLI layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    StateChanged { state: RunState },
    Info(String),
}

/// Payload of a successful run: the pipeline log and the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSuccess {
    pub log: String,
    pub artifact: Artifact,
}

/// Terminal value of a run.
#[derive(Debug)]
pub enum RunResult {
    Succeeded(RunSuccess),
    Failed(crate::error::RunError),
}

impl RunResult {
    pub fn state(&self) -> RunState {
        match self {
            RunResult::Succeeded(_) => RunState::Succeeded,
            RunResult::Failed(_) => RunState::Failed,
        }
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            RunResult::Succeeded(s) => Some(&s.artifact),
            RunResult::Failed(_) => None,
        }
    }
}

/// Serializable summary of a finished run for `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub timestamp_utc: String,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
    pub state: RunState,
    #[serde(default)]
    pub error_kind: Option<String>,
    pub message: String,
    #[serde(default)]
    pub log: Option<String>,
    #[serde(default)]
    pub artifact_path: Option<PathBuf>,
    #[serde(default)]
    pub feature_counts: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strand_tokens_are_case_sensitive() {
        assert_eq!("FR".parse::<StrandSpecificity>().unwrap(), StrandSpecificity::FR);
        assert_eq!("None".parse::<StrandSpecificity>().unwrap(), StrandSpecificity::None);
        assert!(matches!(
            "fr".parse::<StrandSpecificity>(),
            Err(ValidationError::UnknownStrand { .. })
        ));
        assert!(matches!(
            "".parse::<StrandSpecificity>(),
            Err(ValidationError::Blank {
                field: ConfigField::StrandSpecificity
            })
        ));
    }

    #[test]
    fn artifact_text_is_lossy_but_bytes_are_exact() {
        let raw = vec![b'g', 0xff, b'\n'];
        let a = Artifact {
            path: PathBuf::from("/w/data/feature_counts.txt"),
            contents: Bytes::from(raw.clone()),
        };
        assert_eq!(a.bytes(), raw.as_slice());
        assert_eq!(a.text(), "g\u{fffd}\n");
        assert_eq!(a.file_name(), "feature_counts.txt");
    }

    #[test]
    fn field_names_match_config_keys() {
        assert_eq!(ConfigField::Fastq.to_string(), "fastqPath");
        assert_eq!(ConfigField::ReferenceIndex.label(), "Reference index directory");
    }

    #[test]
    fn config_deserializes_with_missing_fields_as_blank() {
        let cfg: RunConfig =
            serde_json::from_str(r#"{"workdir":"/tmp/run1","referenceIndex":"/ref/hg38"}"#)
                .unwrap();
        assert_eq!(cfg.workdir, "/tmp/run1");
        assert_eq!(cfg.reference_index, "/ref/hg38");
        assert_eq!(cfg.fastq_path, "");
    }
}
