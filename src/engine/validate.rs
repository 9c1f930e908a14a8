use crate::error::ValidationError;
use crate::model::{ConfigField, RunConfig, ValidationResult};
use std::path::Path;

/// Checks run inputs before anything expensive starts. Read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathValidator;

/// Path checks in the order they are evaluated; the first failure wins.
const PATH_CHECKS: [(ConfigField, Expect); 4] = [
    (ConfigField::Workdir, Expect::Directory),
    (ConfigField::Fastq, Expect::File),
    (ConfigField::ReferenceIndex, Expect::Exists),
    (ConfigField::Annotations, Expect::File),
];

#[derive(Debug, Clone, Copy)]
enum Expect {
    Directory,
    File,
    // A reference index may be a directory or a file prefix.
    Exists,
}

impl PathValidator {
    pub fn validate(&self, cfg: &RunConfig) -> ValidationResult {
        match self.check(cfg) {
            Ok(()) => ValidationResult::Valid,
            Err(e) => ValidationResult::Invalid(e),
        }
    }

    fn check(&self, cfg: &RunConfig) -> Result<(), ValidationError> {
        // Blank fields are configuration errors and are reported before touching the filesystem.
        for (field, _) in PATH_CHECKS {
            if cfg.value(field).trim().is_empty() {
                return Err(ValidationError::Blank { field });
            }
        }
        cfg.strand()?;

        for (field, expect) in PATH_CHECKS {
            check_path(field, Path::new(cfg.value(field)), expect)?;
        }
        Ok(())
    }
}

fn check_path(field: ConfigField, path: &Path, expect: Expect) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::PathNotFound {
            field,
            path: path.to_path_buf(),
        });
    }
    let expected = match expect {
        Expect::Directory if !path.is_dir() => "directory",
        Expect::File if path.is_dir() => "file",
        _ => return Ok(()),
    };
    Err(ValidationError::WrongKind {
        field,
        path: path.to_path_buf(),
        expected,
    })
}
