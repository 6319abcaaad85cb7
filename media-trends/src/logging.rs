//! Structured logging setup.
//!
//! Logging uses `tracing` throughout the crate. Binaries call
//! [`init_logging`] once; library users can install their own subscriber
//! instead. Log lines go to stderr so stdout carries only the report.

use std::io::IsTerminal;
use tracing::Level;

use crate::error::{Result, TrendsError};

/// Configuration for the logging subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for dependencies and everything else
    pub level: Level,
    /// Log level for media-trends components specifically
    pub crate_level: Level,
    /// Whether to use JSON output format
    pub json_format: bool,
    /// Environment filter override
    pub env_filter: Option<String>,
    /// Whether human-readable output carries ANSI colour codes
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            crate_level: Level::INFO,
            json_format: false,
            env_filter: None,
            ansi: stderr_is_terminal(),
        }
    }
}

impl LoggingConfig {
    /// Creates a configuration for production use.
    pub fn production() -> Self {
        Self {
            level: Level::WARN,
            crate_level: Level::INFO,
            json_format: true,
            env_filter: None,
            ansi: stderr_is_terminal(),
        }
    }

    /// Creates a configuration for development use.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            crate_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
            ansi: stderr_is_terminal(),
        }
    }

    /// Creates a configuration for machine-readable logs.
    pub fn structured() -> Self {
        Self {
            level: Level::INFO,
            crate_level: Level::DEBUG,
            json_format: true,
            env_filter: None,
            ansi: stderr_is_terminal(),
        }
    }

    /// Sets the log level for the application.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the log level for media-trends components.
    pub fn with_crate_level(mut self, level: Level) -> Self {
        self.crate_level = level;
        self
    }

    /// Sets whether to use JSON output format.
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// Sets whether human-readable output is coloured.
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// Sets a custom environment filter.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the environment filter string.
    pub fn env_filter(&self) -> String {
        if let Some(ref filter) = self.env_filter {
            filter.clone()
        } else {
            format!(
                "{},media_trends={}",
                self.level.as_str().to_lowercase(),
                self.crate_level.as_str().to_lowercase()
            )
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// filter computed from `config`.
///
/// # Examples
///
/// ```rust,no_run
/// use media_trends::logging::{init_logging, LoggingConfig};
///
/// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
/// ```
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

    let fmt_layer = if config.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(config.ansi)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TrendsError::Configuration(format!("failed to initialise logging: {e}")))
}

// Colours only make sense when a terminal renders them.
fn stderr_is_terminal() -> bool {
    std::io::stderr().is_terminal()
}
