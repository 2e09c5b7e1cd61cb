//! Tracing subscriber setup.

use crate::format::OutputMode;
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Env var holding the log filter directive.
pub const ENV_LOG: &str = "FIELDCHECK_LOG";

const DEFAULT_FILTER: &str = "warn";

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber once for the process.
///
/// Events go to stderr so stdout stays machine-readable. The filter comes from
/// `FIELDCHECK_LOG` (default `warn`); structured output modes log as JSON.
pub fn init_tracing(mode: OutputMode) {
    TRACING_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_env(ENV_LOG)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let result = if mode.is_structured() {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::init_tracing;
    use crate::format::{OutputFormat, OutputMode};

    #[test]
    fn init_tracing_is_idempotent() {
        let mode = OutputMode {
            format: OutputFormat::Text,
            no_progress: true,
        };
        init_tracing(mode);
        init_tracing(mode);
    }
}
