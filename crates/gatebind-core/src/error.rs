//! Error types shared by the binding pipeline.
//!
//! Field-level problems are never errors in this sense: they are collected into
//! an [`Errors`](crate::validation::Errors) sink and surface as a 400. The types
//! here describe the cases where a value or a whole request cannot be processed.

use thiserror::Error;

// =============================================================================
// Coercion Errors
// =============================================================================

/// A single value could not be converted into a field's declared type.
///
/// The binder turns this into a `typeMismatch` field error; it never aborts an
/// invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// The value has the wrong JSON shape for the target type.
    #[error("expected {expected}, got {got}")]
    UnexpectedKind {
        /// The type the field declares.
        expected: &'static str,
        /// The JSON kind that was supplied.
        got: &'static str,
    },

    /// The value has the right shape but does not parse as the target type.
    #[error("cannot convert '{value}' to {expected}")]
    Unparseable {
        /// The type the field declares.
        expected: &'static str,
        /// The rejected textual value.
        value: String,
    },
}

impl CoercionError {
    /// Creates an [`UnexpectedKind`](Self::UnexpectedKind) error.
    pub fn unexpected(expected: &'static str, got: &'static str) -> Self {
        Self::UnexpectedKind { expected, got }
    }

    /// Creates an [`Unparseable`](Self::Unparseable) error.
    pub fn unparseable(expected: &'static str, value: impl Into<String>) -> Self {
        Self::Unparseable {
            expected,
            value: value.into(),
        }
    }
}

// =============================================================================
// Bind Errors
// =============================================================================

/// The request as a whole is structurally uninterpretable.
///
/// Distinct from field errors: a malformed body means there is nothing to
/// validate in the first place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// The body is not JSON, or is JSON but not an object.
    #[error("malformed request body: {reason}")]
    MalformedBody {
        /// Reason reported by the JSON parser.
        reason: String,
    },
}

impl BindError {
    /// Creates a malformed body error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedBody {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Instantiation Errors
// =============================================================================

/// The target factory could not produce a zero-valued request object.
///
/// This is a wiring mistake, never retried.
#[derive(Debug, Clone, Error)]
#[error("cannot instantiate target '{target}': {reason}")]
pub struct InstantiationError {
    /// Type name of the target.
    pub target: &'static str,
    /// Reason given by the factory.
    pub reason: String,
}

impl InstantiationError {
    /// Creates an instantiation error for target type `T`.
    pub fn of<T>(reason: impl Into<String>) -> Self {
        Self {
            target: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for value coercion.
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Result type for binding operations.
pub type BindResult<T> = Result<T, BindError>;
