//! The bindable target contract.
//!
//! A target is the typed request object of one operation. [`Bindable`] is
//! normally derived with `#[derive(Bindable)]`; hand-written impls only need
//! to keep `bind_field` and `descriptor` in agreement on field names.

use super::constraint::TargetDescriptor;
use super::value::{ConstraintValue, FieldValue};
use crate::error::CoercionError;

/// What happened when one key was offered to a target.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldBinding {
    /// The value was coerced and stored.
    Bound,
    /// The target has no field with this key.
    Unknown,
    /// The field exists but the value could not be coerced.
    Rejected(CoercionError),
}

impl FieldBinding {
    /// Lifts a coercion result into a binding outcome.
    pub fn from_result(result: Result<(), CoercionError>) -> Self {
        match result {
            Ok(()) => Self::Bound,
            Err(e) => Self::Rejected(e),
        }
    }
}

/// A request type that can be populated field by field from untyped input.
pub trait Bindable: Send + 'static {
    /// Name used as `objectName` in field errors.
    fn object_name() -> &'static str;

    /// Constraint metadata, compiled once per process.
    fn descriptor() -> &'static TargetDescriptor;

    /// Coerces `value` into the field bound to `key`.
    fn bind_field(&mut self, key: &str, value: &FieldValue) -> FieldBinding;

    /// Read-only view of the field bound to `key`.
    fn field_value(&self, key: &str) -> Option<ConstraintValue<'_>>;
}
