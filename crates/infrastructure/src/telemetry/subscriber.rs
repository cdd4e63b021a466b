//! Subscriber initialization and configuration
//!
//! Builds a `tracing-subscriber` registry with an `EnvFilter` and either a
//! human-readable or a JSON formatting layer. `RUST_LOG` takes precedence over
//! the configured filter.

use serde::{Deserialize, Serialize};
use tracing::{Subscriber, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Configuration for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (e.g., "info", "application=debug,reqwest=warn")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Line format
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line number in pretty output
    #[serde(default)]
    pub with_file: bool,

    /// Include thread ids
    #[serde(default)]
    pub with_thread_ids: bool,
}

fn default_log_filter() -> String {
    "info,application=debug,infrastructure=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            format: LogFormat::default(),
            with_file: false,
            with_thread_ids: false,
        }
    }
}

/// Keeps a scoped subscriber installed while alive
///
/// Guards returned by [`init_telemetry`] hold nothing; the global subscriber
/// lives for the rest of the process.
pub struct TelemetryGuard {
    scoped: Option<tracing::subscriber::DefaultGuard>,
    format: LogFormat,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("scoped", &self.scoped.is_some())
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl TelemetryGuard {
    /// Whether this guard owns a thread-scoped subscriber
    pub const fn is_scoped(&self) -> bool {
        self.scoped.is_some()
    }

    /// Format of the installed subscriber
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}

fn build_subscriber(config: &TelemetryConfig) -> impl Subscriber + Send + Sync + 'static {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let (json_layer, pretty_layer) = match config.format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_thread_ids(config.with_thread_ids),
            ),
            None,
        ),
        LogFormat::Pretty => (
            None,
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(config.with_thread_ids)
                    .with_file(config.with_file)
                    .with_line_number(config.with_file),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
}

/// Install the global subscriber
///
/// # Example
///
/// ```ignore
/// use infrastructure::telemetry::{TelemetryConfig, init_telemetry};
///
/// let _guard = init_telemetry(&TelemetryConfig::default())?;
/// ```
///
/// # Errors
///
/// Returns `TelemetryError::Init` if a global subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    build_subscriber(config)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(format = ?config.format, filter = %config.log_filter, "Logging initialized");
    Ok(TelemetryGuard {
        scoped: None,
        format: config.format,
    })
}

/// Install a subscriber for the current thread only, until the guard drops
pub fn init_scoped_telemetry(config: &TelemetryConfig) -> TelemetryGuard {
    let guard = tracing::subscriber::set_default(build_subscriber(config));
    TelemetryGuard {
        scoped: Some(guard),
        format: config.format,
    }
}

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to install the subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.log_filter.starts_with("info"));
        assert!(!config.with_file);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let parsed: TelemetryConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(parsed.format, LogFormat::Json);
        assert_eq!(parsed.log_filter, default_log_filter());
    }

    #[test]
    fn scoped_subscriber_is_released_on_drop() {
        let config = TelemetryConfig {
            format: LogFormat::Json,
            ..TelemetryConfig::default()
        };
        let guard = init_scoped_telemetry(&config);
        assert!(guard.is_scoped());
        assert_eq!(guard.format(), LogFormat::Json);
        tracing::info!(word = "apple", "inside scoped subscriber");
        drop(guard);
    }

    #[test]
    fn second_global_init_fails() {
        let config = TelemetryConfig::default();
        let _first = init_telemetry(&config);
        let second = init_telemetry(&config);
        assert!(matches!(second, Err(TelemetryError::Init(_))));
    }
}
