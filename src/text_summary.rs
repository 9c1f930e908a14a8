//! Text summary builder for CLI output.
//!
//! A run renders either as the full success view (log plus count table) or as
//! exactly one error message, never a mix of both.

use crate::model::RunResult;
use std::time::Duration;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build the operator-facing view of a finished run.
pub(crate) fn build_text_summary(result: &RunResult, elapsed: Duration) -> TextSummary {
    let mut lines = Vec::new();
    match result {
        RunResult::Succeeded(s) => {
            lines.push("Analysis Complete!".to_string());
            lines.push(format!(
                "Elapsed: {}",
                humantime::format_duration(round_to_secs(elapsed))
            ));
            push_block(&mut lines, &s.log);
            lines.push(String::new());
            lines.push("Gene Counts:".to_string());
            push_block(&mut lines, &s.artifact.text());
        }
        RunResult::Failed(e) => lines.push(e.to_string()),
    }
    TextSummary { lines }
}

fn push_block(lines: &mut Vec<String>, text: &str) {
    lines.extend(text.lines().map(str::to_string));
}

fn round_to_secs(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunError;
    use crate::model::{Artifact, RunSuccess};
    use bytes::Bytes;
    use std::path::PathBuf;

    #[test]
    fn success_view_shows_log_then_counts() {
        let result = RunResult::Succeeded(RunSuccess {
            log: "step 1\nstep 2\n".into(),
            artifact: Artifact {
                path: PathBuf::from("/w/data/feature_counts.txt"),
                contents: Bytes::from_static(b"gene\tcount\nTP53\t42\n"),
            },
        });
        let summary = build_text_summary(&result, Duration::from_millis(61_500));
        assert_eq!(
            summary.lines,
            [
                "Analysis Complete!",
                "Elapsed: 1m 1s",
                "step 1",
                "step 2",
                "",
                "Gene Counts:",
                "gene\tcount",
                "TP53\t42",
            ]
        );
    }

    #[test]
    fn failure_view_is_a_single_message() {
        let result = RunResult::Failed(RunError::ArtifactMissing {
            path: PathBuf::from("/w/data/feature_counts.txt"),
        });
        let summary = build_text_summary(&result, Duration::ZERO);
        assert_eq!(
            summary.lines,
            ["Feature counts file not found: /w/data/feature_counts.txt"]
        );
    }
}
