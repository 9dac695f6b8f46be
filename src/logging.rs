// src/logging.rs

//! Diagnostics setup using `tracing` + `tracing-subscriber`.
//!
//! Diagnostics go to stderr so they never mix with the relayed output on
//! stdout. Priority for determining the level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SCRIPTVISOR_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `warn`

use tracing_subscriber::fmt;

use crate::cli::LogLevel;
use crate::errors::{Result, ScriptvisorError};

pub const LOG_ENV_VAR: &str = "SCRIPTVISOR_LOG";

/// Initialise the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| ScriptvisorError::LoggingError(e.to_string()))
}

fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> tracing::Level {
    match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => env_value
            .and_then(parse_level_str)
            .unwrap_or(tracing::Level::WARN),
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_beats_environment() {
        let level = resolve_level(Some(LogLevel::Debug), Some("error"));
        assert_eq!(level, tracing::Level::DEBUG);
    }

    #[test]
    fn environment_is_parsed_leniently() {
        assert_eq!(resolve_level(None, Some(" Warning ")), tracing::Level::WARN);
        assert_eq!(resolve_level(None, Some("TRACE")), tracing::Level::TRACE);
    }

    #[test]
    fn unknown_or_missing_level_falls_back_to_warn() {
        assert_eq!(resolve_level(None, Some("loud")), tracing::Level::WARN);
        assert_eq!(resolve_level(None, None), tracing::Level::WARN);
    }
}
