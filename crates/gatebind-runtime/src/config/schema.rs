//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use gatebind_framework::{BindFailureStatus, BinderConfig, DispatchConfig};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GatebindConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Binding pipeline settings.
    #[serde(default)]
    pub binding: BindingConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `full` without it.
    Json,
}

/// Log destination.
///
/// Defaults to stderr: the local runner writes responses to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global level; `RUST_LOG` takes precedence when set.
    pub level: LogLevel,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file, required when `output = "file"`.
    pub file_path: Option<PathBuf>,

    /// Include thread ids in log lines.
    pub thread_ids: bool,

    /// Include source file and line in log lines.
    pub file_location: bool,

    /// Per-module levels, e.g. `gatebind_framework = "debug"`.
    pub filters: HashMap<String, LogLevel>,

    pub span_events: SpanEventConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            file_path: None,
            thread_ids: false,
            file_location: false,
            filters: HashMap::new(),
            span_events: SpanEventConfig::default(),
        }
    }
}

// =============================================================================
// Binding
// =============================================================================

/// Binding pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// How a malformed request body is reported.
    pub bind_failure_status: BindFailureStatus,

    /// Drop keys the target does not declare instead of reporting them.
    pub ignore_unknown_fields: bool,

    /// Message overrides keyed by error code (`NotBlank`, `typeMismatch`, ...).
    pub messages: HashMap<String, String>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            bind_failure_status: BindFailureStatus::default(),
            ignore_unknown_fields: true,
            messages: HashMap::new(),
        }
    }
}

impl BindingConfig {
    /// Dispatcher switches derived from this configuration.
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            bind_failure_status: self.bind_failure_status,
            binder: BinderConfig {
                ignore_unknown_fields: self.ignore_unknown_fields,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatebindConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.output, LogOutput::Stderr);
        assert!(config.binding.ignore_unknown_fields);
        assert_eq!(
            config.binding.bind_failure_status,
            BindFailureStatus::ServerError
        );
    }

    #[test]
    fn test_partial_binding_section() {
        let config: GatebindConfig = serde_json::from_str(
            r#"{"binding": {"bind_failure_status": "client_error"}}"#,
        )
        .unwrap();

        let dispatch = config.binding.dispatch_config();
        assert_eq!(dispatch.bind_failure_status, BindFailureStatus::ClientError);
        assert!(dispatch.binder.ignore_unknown_fields);
    }
}
