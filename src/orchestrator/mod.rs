//! Application-level orchestration.
//!
//! This module owns the run lifecycle (validate, invoke, collect) and post-run
//! processing such as reporting and artifact download. The CLI layer calls into
//! this module to keep presentation separate from decision logic.

mod controller;
mod post_process;

pub(crate) use controller::RunCoordinator;
pub(crate) use post_process::{build_report, save_artifact};
