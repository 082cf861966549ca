//! Structured logging for the binaries.
//!
//! Output goes to stderr so stdout stays a clean JSON document. The filter is
//! read from `PROVIDERSCOPE_LOG` when set, otherwise from the level passed in
//! (default `warn`).

use anyhow::{Result, bail};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILTER_ENV: &str = "PROVIDERSCOPE_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber. Calling it twice is an error.
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let level = parse_log_level(level.unwrap_or(DEFAULT_LEVEL))?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("installing log subscriber: {err}"))?;
    Ok(())
}

/// Parse a level name into a tracing `Level`.
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => bail!("invalid log level '{level}'; use trace, debug, info, warn, or error"),
    }
}
