//! Post-run processing utilities.
//!
//! Turns a terminal `RunResult` into a serializable report and writes the
//! artifact to a download location when asked.

use crate::model::{Artifact, RunReport, RunResult};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Build the report for a finished run.
pub(crate) fn build_report(run_id: &str, elapsed: Duration, result: &RunResult) -> RunReport {
    let timestamp_utc = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into());

    let mut report = RunReport {
        run_id: run_id.to_string(),
        timestamp_utc,
        elapsed,
        state: result.state(),
        error_kind: None,
        message: String::new(),
        log: None,
        artifact_path: None,
        feature_counts: None,
    };
    match result {
        RunResult::Succeeded(s) => {
            report.message = "Analysis Complete!".into();
            report.log = Some(s.log.clone());
            report.artifact_path = Some(s.artifact.path.clone());
            report.feature_counts = Some(s.artifact.text().into_owned());
        }
        RunResult::Failed(e) => {
            report.error_kind = Some(e.kind().to_string());
            report.message = e.to_string();
        }
    }
    report
}

/// Write the artifact bytes unchanged to `dest`.
///
/// If `dest` is an existing directory the artifact keeps its own file name.
pub(crate) fn save_artifact(artifact: &Artifact, dest: &Path) -> Result<PathBuf> {
    let target = if dest.is_dir() {
        dest.join(artifact.file_name())
    } else {
        dest.to_path_buf()
    };
    std::fs::write(&target, artifact.bytes())
        .with_context(|| format!("write feature counts to {}", target.display()))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunError;
    use crate::model::{RunState, RunSuccess};
    use bytes::Bytes;

    fn success() -> RunResult {
        RunResult::Succeeded(RunSuccess {
            log: "ok\n".into(),
            artifact: Artifact {
                path: PathBuf::from("/tmp/run1/data/feature_counts.txt"),
                contents: Bytes::from_static(b"gene\tcount\nTP53\t42\n"),
            },
        })
    }

    #[test]
    fn success_report_carries_counts() {
        let report = build_report("42", Duration::from_secs(3), &success());
        assert_eq!(report.state, RunState::Succeeded);
        assert_eq!(report.message, "Analysis Complete!");
        assert_eq!(report.feature_counts.as_deref(), Some("gene\tcount\nTP53\t42\n"));
        assert!(report.error_kind.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["elapsed"], "3s");
        assert_eq!(json["state"], "Succeeded");
    }

    #[test]
    fn failure_report_has_one_message() {
        let result = RunResult::Failed(RunError::ProcessExit {
            exit_code: Some(2),
            stderr: "boom".into(),
        });
        let report = build_report("7", Duration::from_millis(10), &result);
        assert_eq!(report.state, RunState::Failed);
        assert_eq!(report.error_kind.as_deref(), Some("ProcessExitError"));
        assert_eq!(report.message, "Error occurred: boom");
        assert!(report.feature_counts.is_none());
        assert!(report.log.is_none());
    }

    #[test]
    fn save_into_directory_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let result = success();
        let artifact = result.artifact().unwrap();

        let written = save_artifact(artifact, dir.path()).unwrap();
        assert_eq!(written, dir.path().join("feature_counts.txt"));
        assert_eq!(std::fs::read(&written).unwrap(), artifact.bytes());

        let renamed = save_artifact(artifact, &dir.path().join("sample1.counts")).unwrap();
        assert_eq!(std::fs::read(renamed).unwrap(), artifact.bytes());
    }
}
