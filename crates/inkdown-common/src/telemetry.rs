//! Console logging for the `inkdown` binary.
//!
//! ```ignore
//! inkdown_common::telemetry::init(TelemetryConfig::from_env("inkdown"));
//! ```
//!
//! `RUST_LOG` wins over the configured level when it is set and parses.

use std::io::IsTerminal;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Reported once the subscriber is up.
    pub service_name: String,
    /// DEBUG for debug builds, INFO for release builds.
    pub console_level: Level,
    /// Colour output. Off when stderr is not a terminal.
    pub ansi: bool,
}

impl TelemetryConfig {
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            console_level: if cfg!(debug_assertions) {
                Level::DEBUG
            } else {
                Level::INFO
            },
            ansi: std::io::stderr().is_terminal(),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.console_level = level;
        self
    }

    fn filter(&self) -> EnvFilter {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::default().add_directive(self.console_level.into()),
        }
    }
}

/// Install a compact stderr subscriber. Stdout is left for command output.
///
/// A second call keeps whichever subscriber was installed first.
pub fn init(config: TelemetryConfig) {
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false)
        .with_filter(config.filter());

    if let Err(e) = tracing_subscriber::registry().with(layer).try_init() {
        tracing::debug!(error = %e, "keeping existing subscriber");
        return;
    }
    tracing::debug!(service = %config.service_name, level = %config.console_level, "logging ready");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_override() {
        let config = TelemetryConfig::from_env("inkdown").with_level(Level::WARN);
        assert_eq!(config.console_level, Level::WARN);
        assert_eq!(config.service_name, "inkdown");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(TelemetryConfig::from_env("first"));
        init(TelemetryConfig::from_env("second"));
        tracing::info!("still logging");
    }
}
