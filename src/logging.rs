//! Diagnostic tracing
//!
//! Tracing output is opt-in through `RHEAD_LOG` (standard `EnvFilter`
//! directives, e.g. `RHEAD_LOG=debug`). With the variable unset nothing is
//! emitted, so stderr only carries the one-line failure diagnostics.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the tracing filter
pub const LOG_ENV: &str = "RHEAD_LOG";

fn env_filter() -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {} filter: {:?}", LOG_ENV, directives)),
        Err(_) => Ok(EnvFilter::new("off")),
    }
}

/// Install the global subscriber, writing compact events to stderr
pub fn init() -> Result<()> {
    let filter = env_filter()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init()
        .context("failed to install tracing subscriber")
}
