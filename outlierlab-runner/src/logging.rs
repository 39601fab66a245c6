//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "OUTLIERLAB_LOG";

const DEFAULT_FILTER: &str = "outlierlab=info";

static INIT: Once = Once::new();

/// Initialize logging to stderr, so console tables on stdout stay clean.
///
/// Reads `OUTLIERLAB_LOG` for filter directives, e.g.
/// `OUTLIERLAB_LOG=outlierlab_core=debug,outlierlab_runner=info`.
/// Falls back to `outlierlab=info` when unset or invalid. Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
