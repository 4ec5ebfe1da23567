//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--verbose` flag (debug)
//! 2. `TASKGRAPH_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `warn`
//!
//! Events go to stderr; stdout carries command output only.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

/// Environment variable consulted for the log level
pub const LOG_ENV: &str = "TASKGRAPH_LOG";

/// Installs the global logging subscriber.
///
/// Call once at startup; a second call returns an error.
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = resolve_level(verbose, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}

fn resolve_level(verbose: bool, env_value: Option<&str>) -> Level {
    if verbose {
        return Level::DEBUG;
    }
    env_value.and_then(parse_level_str).unwrap_or(Level::WARN)
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_env() {
        assert_eq!(resolve_level(true, Some("error")), Level::DEBUG);
    }

    #[test]
    fn env_level_is_used() {
        assert_eq!(resolve_level(false, Some("Info")), Level::INFO);
        assert_eq!(resolve_level(false, Some(" trace ")), Level::TRACE);
    }

    #[test]
    fn defaults_to_warn() {
        assert_eq!(resolve_level(false, None), Level::WARN);
        assert_eq!(resolve_level(false, Some("loud")), Level::WARN);
    }
}
