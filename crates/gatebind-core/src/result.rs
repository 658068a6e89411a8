//! The result envelope returned by every action.
//!
//! [`ActionResult`] pairs a status code with headers and an [`Entity`]. Its
//! fields are private so that status and entity can only be set together:
//!
//! | Constructor | Status | Entity |
//! |---|---|---|
//! | [`success`](ActionResult::success) | 200 | [`Entity::Payload`] |
//! | [`bad_request`](ActionResult::bad_request) | 400 | [`Entity::FieldErrors`] |
//! | [`failure`](ActionResult::failure) | 500 | [`Entity::Failure`] |

use serde::{Deserialize, Serialize};

use crate::foundation::Headers;
use crate::validation::FieldError;

/// Body of a 500-class response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// The entity carried by an [`ActionResult`].
///
/// Serializes as the bare payload, the bare error array, or `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity<T> {
    /// Business output of a successful action.
    Payload(T),
    /// Field errors of a rejected request.
    FieldErrors(Vec<FieldError>),
    /// Description of an internal failure.
    Failure(ErrorBody),
}

/// Status code, headers and entity produced by one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult<T> {
    status_code: u16,
    headers: Headers,
    entity: Entity<T>,
}

impl<T> ActionResult<T> {
    /// A 200 result carrying `entity`.
    pub fn success(entity: T) -> Self {
        Self::success_with_headers(entity, Headers::new())
    }

    /// A 200 result carrying `entity` and the given headers.
    pub fn success_with_headers(entity: T, headers: Headers) -> Self {
        Self {
            status_code: 200,
            headers,
            entity: Entity::Payload(entity),
        }
    }

    /// A 400 result carrying the error sequence.
    pub fn bad_request(errors: impl Into<Vec<FieldError>>) -> Self {
        Self {
            status_code: 400,
            headers: Headers::new(),
            entity: Entity::FieldErrors(errors.into()),
        }
    }

    /// A 500 result describing an internal failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::failure_with_status(500, message)
    }

    /// A server-error result with a specific 5xx status.
    ///
    /// Statuses outside `500..=599` are clamped to 500.
    pub fn failure_with_status(status_code: u16, message: impl Into<String>) -> Self {
        let status_code = if (500..=599).contains(&status_code) {
            status_code
        } else {
            500
        };
        Self {
            status_code,
            headers: Headers::new(),
            entity: Entity::Failure(ErrorBody {
                message: message.into(),
            }),
        }
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn entity(&self) -> &Entity<T> {
        &self.entity
    }

    /// Returns the payload of a successful result.
    pub fn payload(&self) -> Option<&T> {
        match &self.entity {
            Entity::Payload(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the field errors of a rejected result.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match &self.entity {
            Entity::FieldErrors(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.entity, Entity::Payload(_))
    }

    /// Splits the result into its parts.
    pub fn into_parts(self) -> (u16, Headers, Entity<T>) {
        (self.status_code, self.headers, self.entity)
    }

    /// Maps the payload, leaving error entities untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        let entity = match self.entity {
            Entity::Payload(p) => Entity::Payload(f(p)),
            Entity::FieldErrors(e) => Entity::FieldErrors(e),
            Entity::Failure(b) => Entity::Failure(b),
        };
        ActionResult {
            status_code: self.status_code,
            headers: self.headers,
            entity,
        }
    }
}
