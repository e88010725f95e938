//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `U_EDA_LOG=u_eda::plots=debug`.
pub const LOG_ENV: &str = "U_EDA_LOG";

const DEFAULT_FILTER: &str = "u_eda=info";

/// Installs the global subscriber, logging to stderr so stdout carries
/// only the report.
///
/// Falls back to `u_eda=info` if `U_EDA_LOG` is unset or invalid.
/// Calling it more than once is a no-op.
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
