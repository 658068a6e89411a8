//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
///
/// Invocation failures are never reported here: the dispatcher answers them
/// with a response. These cover setup and the local runner's IO.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A raw event is not a valid gateway event.
    #[error("Malformed gateway event: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    /// An input line is not valid UTF-8.
    #[error("Malformed gateway event: {0}")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),

    /// A response could not be encoded.
    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    /// Reading events or writing responses failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
