use std::path::PathBuf;
use thiserror::Error;

use crate::model::ConfigField;

/// Pre-flight rejection of a `RunConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide all the required parameters! ({field} is blank)")]
    Blank { field: ConfigField },
    #[error("Error: strand specificity must be one of None, RF, FR (got '{token}')")]
    UnknownStrand { token: String },
    #[error("Error: {} '{}' does not exist.", .field.label(), .path.display())]
    PathNotFound { field: ConfigField, path: PathBuf },
    #[error("Error: {} '{}' is not a {expected}.", .field.label(), .path.display())]
    WrongKind {
        field: ConfigField,
        path: PathBuf,
        expected: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> ConfigField {
        match self {
            ValidationError::Blank { field }
            | ValidationError::PathNotFound { field, .. }
            | ValidationError::WrongKind { field, .. } => *field,
            ValidationError::UnknownStrand { .. } => ConfigField::StrandSpecificity,
        }
    }
}

/// Failure to get the pipeline process running at all.
///
/// A pipeline that starts and then exits non-zero is not an `InvokeError`;
/// that is reported through `ProcessOutcome::exit_code`.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("could not launch pipeline '{}': {source}", .command.display())]
    Launch {
        command: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("pipeline '{}' failed while running: {source}", .command.display())]
    Io {
        command: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid run configuration: {0}")]
    Config(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Feature counts file not found: {}", .path.display())]
    Missing { path: PathBuf },
    #[error("could not read feature counts file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Classified terminal failure of a run. Each variant renders as exactly one operator message.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Error: could not launch pipeline '{}': {source}", .command.display())]
    ProcessLaunch {
        command: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error occurred: {stderr}")]
    ProcessExit { exit_code: Option<i32>, stderr: String },
    #[error("Feature counts file not found: {}", .path.display())]
    ArtifactMissing { path: PathBuf },
    #[error("An error occurred: {message}")]
    Unexpected { message: String },
}

impl RunError {
    /// Taxonomy name of the failure, stable across message wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Validation(
                ValidationError::PathNotFound { .. } | ValidationError::WrongKind { .. },
            ) => "PathNotFound",
            RunError::Validation(_) => "ConfigurationError",
            RunError::ProcessLaunch { .. } => "ProcessLaunchError",
            RunError::ProcessExit { .. } => "ProcessExitError",
            RunError::ArtifactMissing { .. } => "ArtifactMissingError",
            RunError::Unexpected { .. } => "UnexpectedError",
        }
    }

    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        RunError::Unexpected {
            message: err.to_string(),
        }
    }
}

impl From<InvokeError> for RunError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::Launch { command, source } => RunError::ProcessLaunch { command, source },
            InvokeError::Config(e) => RunError::Validation(e),
            other @ InvokeError::Io { .. } => RunError::unexpected(other),
        }
    }
}

impl From<CollectError> for RunError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::Missing { path } => RunError::ArtifactMissing { path },
            other @ CollectError::Read { .. } => RunError::unexpected(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_not_found_names_the_field_and_path() {
        let err = ValidationError::PathNotFound {
            field: ConfigField::Workdir,
            path: PathBuf::from("/tmp/missing"),
        };
        assert_eq!(
            err.to_string(),
            "Error: Working directory '/tmp/missing' does not exist."
        );
        assert_eq!(RunError::from(err).kind(), "PathNotFound");
    }

    #[test]
    fn blank_field_is_a_configuration_error() {
        let err = RunError::from(ValidationError::Blank {
            field: ConfigField::Fastq,
        });
        assert_eq!(err.kind(), "ConfigurationError");
        assert_eq!(
            err.to_string(),
            "Please provide all the required parameters! (fastqPath is blank)"
        );
    }

    #[test]
    fn process_exit_carries_stderr_verbatim() {
        let err = RunError::ProcessExit {
            exit_code: Some(2),
            stderr: "boom".into(),
        };
        assert_eq!(err.to_string(), "Error occurred: boom");
        assert_eq!(err.kind(), "ProcessExitError");
    }

    #[test]
    fn collect_read_failure_becomes_unexpected() {
        let err = RunError::from(CollectError::Read {
            path: PathBuf::from("/w/data/feature_counts.txt"),
            source: std::io::Error::other("disk on fire"),
        });
        assert_eq!(err.kind(), "UnexpectedError");
        assert!(err.to_string().starts_with("An error occurred: could not read"));
    }

    #[test]
    fn launch_failure_keeps_its_own_kind() {
        let err = RunError::from(InvokeError::Launch {
            command: PathBuf::from("./pipeline.sh"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(err.kind(), "ProcessLaunchError");
    }
}
