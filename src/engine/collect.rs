use crate::error::CollectError;
use crate::model::Artifact;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Locates and reads the count table a successful pipeline left behind.
#[derive(Debug, Clone)]
pub struct ResultCollector {
    output: PathBuf,
}

impl ResultCollector {
    /// `output` is the artifact location relative to a run's working directory.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    /// Read the artifact under `workdir` fully into memory.
    pub fn collect(&self, workdir: &Path) -> Result<Artifact, CollectError> {
        let path = workdir.join(&self.output);
        match std::fs::read(&path) {
            Ok(raw) => Ok(Artifact {
                path,
                contents: Bytes::from(raw),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CollectError::Missing { path }),
            Err(source) => Err(CollectError::Read { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_artifact_bytes_exactly() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        let body = b"gene\tcount\nTP53\t42\n";
        std::fs::write(dir.path().join("data/feature_counts.txt"), body).unwrap();

        let artifact = ResultCollector::new("data/feature_counts.txt")
            .collect(dir.path())
            .unwrap();
        assert_eq!(artifact.bytes(), body);
        assert_eq!(artifact.text(), "gene\tcount\nTP53\t42\n");
        assert_eq!(artifact.path, dir.path().join("data/feature_counts.txt"));
    }

    #[test]
    fn custom_output_location_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("out")).unwrap();
        std::fs::write(dir.path().join("out/counts.tsv"), "g\t1\n").unwrap();
        let artifact = ResultCollector::new("out/counts.tsv")
            .collect(dir.path())
            .unwrap();
        assert_eq!(artifact.path, dir.path().join("out/counts.tsv"));
        assert_eq!(artifact.file_name(), "counts.tsv");
    }

    #[test]
    fn absent_artifact_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResultCollector::new("data/feature_counts.txt")
            .collect(dir.path())
            .unwrap_err();
        assert!(matches!(err, CollectError::Missing { .. }));
    }

    #[test]
    fn unreadable_artifact_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as one.
        std::fs::create_dir_all(dir.path().join("data/feature_counts.txt")).unwrap();
        let err = ResultCollector::new("data/feature_counts.txt")
            .collect(dir.path())
            .unwrap_err();
        assert!(matches!(err, CollectError::Read { .. }));
    }
}
