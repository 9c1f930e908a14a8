//! Run lifecycle controller.
//!
//! Sequences validation, invocation and collection for one run and emits
//! state changes for presentation layers.

use crate::engine::{PathValidator, PipelineInvoker, PipelineSpec, ResultCollector, ScriptInvoker};
use crate::error::RunError;
use crate::model::{RunConfig, RunEvent, RunResult, RunState, RunSuccess, ValidationResult};
use tokio::sync::mpsc::UnboundedSender;

/// Drives a single run through `Idle → Validating → Invoking → Collecting → Succeeded | Failed`.
///
/// Runs are not retried and the coordinator holds no state across them beyond
/// the last state reached. Callers must not start a second run while one is
/// in flight.
pub struct RunCoordinator<I = ScriptInvoker> {
    validator: PathValidator,
    invoker: I,
    collector: ResultCollector,
    state: RunState,
    event_tx: Option<UnboundedSender<RunEvent>>,
}

impl RunCoordinator<ScriptInvoker> {
    pub fn new(spec: PipelineSpec) -> Self {
        let collector = ResultCollector::new(spec.output.clone());
        Self::with_invoker(ScriptInvoker::new(spec), collector)
    }
}

impl<I: PipelineInvoker> RunCoordinator<I> {
    pub fn with_invoker(invoker: I, collector: ResultCollector) -> Self {
        Self {
            validator: PathValidator,
            invoker,
            collector,
            state: RunState::Idle,
            event_tx: None,
        }
    }

    /// Emit state changes and notices on `tx`. A closed receiver is ignored.
    pub fn with_events(mut self, tx: UnboundedSender<RunEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute one run to a terminal state. Blocks until the pipeline exits.
    pub fn run(&mut self, cfg: &RunConfig) -> RunResult {
        let result = match self.drive(cfg) {
            Ok(success) => {
                tracing::info!(artifact = %success.artifact.path.display(), "run succeeded");
                RunResult::Succeeded(success)
            }
            Err(e) => {
                tracing::info!(kind = e.kind(), error = %e, "run failed");
                RunResult::Failed(e)
            }
        };
        self.transition(result.state());
        result
    }

    fn drive(&mut self, cfg: &RunConfig) -> Result<RunSuccess, RunError> {
        self.transition(RunState::Validating);
        if let ValidationResult::Invalid(e) = self.validator.validate(cfg) {
            return Err(e.into());
        }

        self.transition(RunState::Invoking);
        self.notify("Running analysis... This may take a while. Please wait.");
        let outcome = self.invoker.invoke(cfg)?;
        tracing::debug!(
            command = %self.invoker.command().display(),
            exit_code = ?outcome.exit_code,
            "pipeline exited"
        );
        if !outcome.success() {
            return Err(RunError::ProcessExit {
                exit_code: outcome.exit_code,
                stderr: outcome.stderr,
            });
        }

        self.transition(RunState::Collecting);
        let artifact = self.collector.collect(cfg.workdir())?;
        Ok(RunSuccess {
            log: outcome.stdout,
            artifact,
        })
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
        self.emit(RunEvent::StateChanged { state: next });
    }

    fn notify(&self, msg: &str) {
        self.emit(RunEvent::Info(msg.to_string()));
    }

    fn emit(&self, ev: RunEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(ev);
        }
    }
}
