//! Logging setup
//!
//! Log output goes to stderr through `tracing-subscriber`. The filter comes
//! from `CHMOD_PLUGIN_LOG`, then `RUST_LOG`, then defaults to `info`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "CHMOD_PLUGIN_LOG";

/// Initialize logging from the environment
///
/// An unparsable environment filter falls back to `info` with a warning.
pub fn init_logging() -> Result<()> {
    let raw = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok();

    let (env_filter, rejected) = env_filter_or_default(raw.as_deref());
    install(env_filter);

    if let Some(raw) = rejected {
        tracing::warn!("Ignoring invalid log filter '{}', using 'info'", raw);
    }
    Ok(())
}

/// Parse an environment-supplied filter, keeping the rejected text for a warning
fn env_filter_or_default(raw: Option<&str>) -> (EnvFilter, Option<String>) {
    match raw {
        Some(raw) => match EnvFilter::try_new(raw) {
            Ok(filter) => (filter, None),
            Err(_) => (EnvFilter::new("info"), Some(raw.to_string())),
        },
        None => (EnvFilter::new("info"), None),
    }
}

/// Initialize logging with an explicit filter (e.g. `"debug"` or
/// `"chmod_plugin=trace"`)
///
/// Does nothing if a global subscriber is already installed.
pub fn init_logging_with_filter(filter: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(filter)
        .map_err(|e| anyhow!("Invalid log filter '{}': {}", filter, e))?;

    install(env_filter);
    Ok(())
}

fn install(env_filter: EnvFilter) {
    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialized");
    }
}
