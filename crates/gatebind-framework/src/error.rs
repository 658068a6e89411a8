//! Error types for the gatebind framework.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatebind_core::{BindError, InstantiationError};

/// Error type returned by actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How a [`BindError`] (malformed body) is reported to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindFailureStatus {
    /// 500 with `{"message": ...}`, the same as any internal failure.
    #[default]
    ServerError,
    /// 400 with a single field error on `body`.
    ClientError,
}

/// Every failure the pipeline can hit, kept apart until the response boundary.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The target factory failed.
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),

    /// The request could not be interpreted.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The action returned an error.
    #[error("{0}")]
    Action(BoxError),

    /// The action panicked.
    #[error("action panicked: {0}")]
    Panic(String),

    /// The entity could not be serialized into the response body.
    #[error("failed to serialize response entity: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DispatchError {
    /// Status code this failure maps to under `policy`.
    pub fn status_code(&self, policy: BindFailureStatus) -> u16 {
        match (self, policy) {
            (Self::Bind(_), BindFailureStatus::ClientError) => 400,
            _ => 500,
        }
    }

    /// Short name of the failure kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Instantiation(_) => "instantiation",
            Self::Bind(_) => "bind",
            Self::Action(_) => "action",
            Self::Panic(_) => "panic",
            Self::Serialize(_) => "serialize",
        }
    }
}

/// Errors raised by the process-wide constraint registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The registry was initialized before this install call.
    #[error("constraint registry is already initialized")]
    AlreadyInitialized,
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_failure_classification_follows_policy() {
        let err = DispatchError::from(BindError::malformed("eof"));
        assert_eq!(err.status_code(BindFailureStatus::ServerError), 500);
        assert_eq!(err.status_code(BindFailureStatus::ClientError), 400);
    }

    #[test]
    fn test_other_failures_are_always_500() {
        let err = DispatchError::Action("boom".into());
        assert_eq!(err.status_code(BindFailureStatus::ClientError), 500);
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.kind(), "action");
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: BindFailureStatus = serde_json::from_str("\"client_error\"").unwrap();
        assert_eq!(policy, BindFailureStatus::ClientError);
    }
}
