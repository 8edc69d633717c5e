//! Logging setup for the dtmf-player binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the binary or to the embedding application.

use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{DtmfError, Result};

/// Installs a stderr fmt subscriber at `level`.
///
/// `RUST_LOG` directives, when set, take precedence over `level`.
pub fn init_logging(level: &str) -> Result<()> {
    let level = parse_log_level(level)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| DtmfError::invalid_config(format!("Failed to install logger: {}", e)))?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Parses a log level name, ignoring case.
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(DtmfError::invalid_config(format!("Invalid log level: {}", level))),
    }
}
