//! Logging setup for tweetshape.
//!
//! The validator only emits `trace!` and `debug!` events; the binary picks
//! what reaches the terminal. Everything goes to stderr so stdout stays
//! clean for JSON output. `RUST_LOG` overrides the chosen level.
//!
//! ```rust
//! use tweetshape::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_flags(false, true));
//! tracing::debug!("checking sources");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// ANSI colors on stderr.
    pub colors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Debug,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event, no timestamps.
    Compact,
    /// Multi-line events with timestamps and module targets.
    Pretty,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            colors: true,
        }
    }
}

impl LogConfig {
    /// Pick a config from `--quiet` / `--verbose`. Quiet wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self {
                level: LogLevel::Error,
                ..Self::default()
            },
            (false, true) => Self {
                level: LogLevel::Debug,
                format: LogFormat::Pretty,
                ..Self::default()
            },
            (false, false) => Self::default(),
        }
    }

    /// Filter directive scoped to this crate.
    #[must_use]
    pub fn directive(&self) -> String {
        let level = match self.level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Debug => "debug",
            LogLevel::Off => "off",
        };
        format!("tweetshape={level}")
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let compact = (config.format == LogFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_ansi(config.colors)
            .with_writer(std::io::stderr)
    });
    let pretty = (config.format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .pretty()
            .with_ansi(config.colors)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(pretty)
        .try_init()
        .ok();
}

/// Silent logging for tests, unless `RUST_LOG` is set.
pub fn init_test_logging() {
    init_logging(&LogConfig {
        level: LogLevel::Off,
        ..LogConfig::default()
    });
}

/// Logging for the binary, driven by its global flags.
pub fn init_cli_logging(quiet: bool, verbose: bool, colors: bool) {
    let config = LogConfig {
        colors,
        ..LogConfig::from_flags(quiet, verbose)
    };
    init_logging(&config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_compact_warn() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.directive(), "tweetshape=warn");
    }

    #[test]
    fn test_flags_pick_level() {
        assert_eq!(LogConfig::from_flags(false, false), LogConfig::default());
        assert_eq!(LogConfig::from_flags(true, false).level, LogLevel::Error);

        let verbose = LogConfig::from_flags(false, true);
        assert_eq!(verbose.level, LogLevel::Debug);
        assert_eq!(verbose.format, LogFormat::Pretty);
    }

    #[test]
    fn test_quiet_beats_verbose() {
        let config = LogConfig::from_flags(true, true);
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_off_directive() {
        let config = LogConfig {
            level: LogLevel::Off,
            ..LogConfig::default()
        };
        assert_eq!(config.directive(), "tweetshape=off");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_test_logging();
        init_test_logging();
    }
}
