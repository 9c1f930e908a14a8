use super::PipelineSpec;
use crate::error::InvokeError;
use crate::model::{ProcessOutcome, RunConfig};
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs the external pipeline for one `RunConfig`.
///
/// Implementations block until the pipeline exits. A non-zero exit is a
/// normal `ProcessOutcome`; `Err` is reserved for failing to run it at all.
pub trait PipelineInvoker {
    fn invoke(&self, cfg: &RunConfig) -> Result<ProcessOutcome, InvokeError>;

    /// Program being launched, for logs and messages.
    fn command(&self) -> &Path;
}

/// Invokes the pipeline script described by a `PipelineSpec`.
#[derive(Debug, Clone)]
pub struct ScriptInvoker {
    spec: PipelineSpec,
}

impl ScriptInvoker {
    pub fn new(spec: PipelineSpec) -> Self {
        Self { spec }
    }
}

impl PipelineInvoker for ScriptInvoker {
    fn invoke(&self, cfg: &RunConfig) -> Result<ProcessOutcome, InvokeError> {
        let args = self.spec.render_args(cfg)?;
        let command = &self.spec.command;

        // Not fatal: if the bit cannot be set, the launch below reports the real problem.
        match ensure_executable(command) {
            Ok(true) => tracing::info!(command = %command.display(), "marked pipeline executable"),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(command = %command.display(), error = %e, "could not mark pipeline executable")
            }
        }

        tracing::debug!(command = %command.display(), ?args, "launching pipeline");
        let child = Command::new(command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| InvokeError::Launch {
                command: command.clone(),
                source,
            })?;

        // No timeout: a hung pipeline hangs the run.
        let output = child
            .wait_with_output()
            .map_err(|source| InvokeError::Io {
                command: command.clone(),
                source,
            })?;

        Ok(ProcessOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn command(&self) -> &Path {
        &self.spec.command
    }
}

/// Add execute permission to `path` if it is missing.
///
/// Returns `Ok(true)` when the mode was changed and `Ok(false)` when the file was
/// already executable, so repeated calls are no-ops.
#[cfg(unix)]
pub fn ensure_executable(path: &Path) -> std::io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    let mode = perms.mode();
    if mode & 0o111 == 0o111 {
        return Ok(false);
    }
    perms.set_mode(mode | 0o111);
    std::fs::set_permissions(path, perms)?;
    Ok(true)
}

#[cfg(not(unix))]
pub fn ensure_executable(path: &Path) -> std::io::Result<bool> {
    std::fs::metadata(path).map(|_| false)
}
