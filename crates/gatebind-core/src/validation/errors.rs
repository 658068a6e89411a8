//! Field errors, the mutable error sink and the frozen validation outcome.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single field-level failure.
///
/// `field`, `code` and `message` are always present on the wire;
/// `rejectedValue` only when the binder knows the offending input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Name of the target object the field belongs to.
    pub object_name: String,
    /// Field identifier as seen by the client.
    pub field: String,
    /// Stable error code (e.g. `NotBlank`, `typeMismatch`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// The input value that was rejected, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_value: Option<Value>,
}

impl FieldError {
    /// Creates a field error without a rejected value.
    pub fn new(
        object_name: impl Into<String>,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            object_name: object_name.into(),
            field: field.into(),
            code: code.into(),
            message: message.into(),
            rejected_value: None,
        }
    }

    /// Attaches the rejected input value.
    pub fn rejected(mut self, value: Value) -> Self {
        self.rejected_value = Some(value);
        self
    }
}

// =============================================================================
// Errors: the sink
// =============================================================================

/// Append-only collector handed to validators.
///
/// Validators report failures by calling [`reject_value`](Self::reject_value);
/// the binder freezes the sink into a [`BindingResult`] once every pass ran.
/// Duplicate `(field, code)` pairs are kept.
#[derive(Debug, Clone, Default)]
pub struct Errors {
    object_name: String,
    errors: Vec<FieldError>,
}

impl Errors {
    /// Creates an empty sink for the named target object.
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            errors: Vec::new(),
        }
    }

    /// Returns the name of the target object.
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Records a failure on `field`.
    pub fn reject_value(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        let error = FieldError::new(self.object_name.clone(), field, code, message);
        self.errors.push(error);
    }

    /// Records a failure on `field` together with the offending input.
    pub fn reject_value_with(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        rejected: Value,
    ) {
        let error =
            FieldError::new(self.object_name.clone(), field, code, message).rejected(rejected);
        self.errors.push(error);
    }

    /// Appends a prebuilt error.
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if at least one error targets `field`.
    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Freezes the sink.
    pub fn into_result(self) -> BindingResult {
        BindingResult {
            object_name: self.object_name,
            errors: self.errors,
        }
    }
}

// =============================================================================
// BindingResult: the frozen outcome
// =============================================================================

/// The immutable outcome of binding and validating one target.
///
/// Produced once per invocation and moved into the action.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BindingResult {
    object_name: String,
    errors: Vec<FieldError>,
}

impl BindingResult {
    /// Returns the name of the target object.
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// All errors, in the order they were reported.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Errors reported against `field`.
    pub fn field_errors<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// The first error reported against `field`.
    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.field_error(field).is_some()
    }

    /// Consumes the outcome, returning the error sequence.
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl From<BindingResult> for Vec<FieldError> {
    fn from(result: BindingResult) -> Self {
        result.into_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_preserves_report_order_and_duplicates() {
        let mut errors = Errors::new("SampleInput");
        errors.reject_value("b", "X", "first");
        errors.reject_value("a", "Y", "second");
        errors.reject_value("b", "X", "first");

        let result = errors.into_result();
        let fields: Vec<_> = result.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["b", "a", "b"]);
        assert_eq!(result.field_errors("b").count(), 2);
        assert_eq!(result.object_name(), "SampleInput");
    }

    #[test]
    fn test_rejected_value_is_serialized_only_when_present() {
        let plain = FieldError::new("T", "f", "C", "m");
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("rejectedValue").is_none());
        assert_eq!(json["objectName"], "T");

        let with_value = plain.rejected(Value::from(3));
        let json = serde_json::to_value(&with_value).unwrap();
        assert_eq!(json["rejectedValue"], 3);
    }
}
