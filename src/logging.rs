//! Structured logging setup.
//!
//! `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=geneflow=debug`
//! to see every state transition and the pipeline command line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// the run summary or JSON report.
pub(crate) fn init_tracing(silent: bool) {
    let default = if silent { "off" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // try_init: a subscriber may already be installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
