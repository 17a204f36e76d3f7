//! Logging setup for the command-line tool.
//!
//! Log lines go to stderr so that stdout carries only the export result. The
//! filter and line format are read from the environment:
//!
//! - `IPYNB_API_LOG`: an [`EnvFilter`] directive such as `debug` or
//!   `ipynb_api=trace` (default `info`)
//! - `IPYNB_API_LOG_FORMAT`: `compact` (default) or `json`

use std::env;
use std::fmt;
use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::error::NotebookError;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "IPYNB_API_LOG";

/// Environment variable selecting the log line format.
pub const LOG_FORMAT_ENV: &str = "IPYNB_API_LOG_FORMAT";

/// Filter applied when [`LOG_FILTER_ENV`] is unset.
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human-readable records.
    #[default]
    Compact,
    /// One JSON object per record.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => f.write_str("compact"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(NotebookError::Configuration {
                message: format!("unsupported log format '{s}': expected compact or json"),
            }),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// [`EnvFilter`] directive selecting which events are recorded.
    pub directive: String,
    /// Line format.
    pub format: LogFormat,
    /// Format value that was not recognised and was replaced by the default.
    pub unrecognised_format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directive: DEFAULT_LOG_DIRECTIVE.to_owned(),
            format: LogFormat::default(),
            unrecognised_format: None,
        }
    }
}

impl LoggingConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup, treating blank
    /// values as unset.
    ///
    /// An unknown format falls back to [`LogFormat::Compact`]; the rejected
    /// value is kept so that [`init_logging`] can report it.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());

        let directive = value(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_owned());
        let (format, unrecognised_format) = match value(LOG_FORMAT_ENV) {
            None => (LogFormat::default(), None),
            Some(raw) => match raw.parse() {
                Ok(format) => (format, None),
                Err(_) => (LogFormat::default(), Some(raw)),
            },
        };

        Self {
            directive,
            format,
            unrecognised_format,
        }
    }
}

/// Parses the filter directive, falling back to [`DEFAULT_LOG_DIRECTIVE`].
///
/// The second element carries the parse error when the fallback was used.
fn build_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(error) => (EnvFilter::new(DEFAULT_LOG_DIRECTIVE), Some(error.to_string())),
    }
}

/// Installs the global tracing subscriber.
///
/// An invalid directive or an unrecognised format does not stop the run: the
/// defaults are installed instead and a warning is logged through the new
/// subscriber.
///
/// # Errors
///
/// Returns [`NotebookError::Configuration`] when a global subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), NotebookError> {
    let (filter, filter_error) = build_filter(&config.directive);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|error| NotebookError::Configuration {
        message: format!("failed to install tracing subscriber: {error}"),
    })?;

    if let Some(error) = filter_error {
        tracing::warn!(
            directive = %config.directive,
            %error,
            "invalid {LOG_FILTER_ENV}, using '{DEFAULT_LOG_DIRECTIVE}'"
        );
    }
    if let Some(raw) = &config.unrecognised_format {
        tracing::warn!(
            format = %raw,
            "unknown {LOG_FORMAT_ENV}, using '{}'",
            LogFormat::default()
        );
    }
    Ok(())
}
