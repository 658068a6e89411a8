//! Structural validation driven by declared constraints.
//!
//! [`ConstraintValidator`] walks the [`TargetDescriptor`] of its target type and
//! checks every constraint that applies to the active groups. A field that
//! already carries an error (its value failed to coerce) is skipped, so a bad
//! value is reported once.

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use serde_json::Value;
use tracing::trace;

use gatebind_core::{Bindable, ConstraintValue, Errors, Groups, Validator};

use crate::registry::ConstraintRegistry;

/// Validator for the `#[validate(...)]` constraints of target type `I`.
pub struct ConstraintValidator<I> {
    registry: &'static ConstraintRegistry,
    _marker: PhantomData<fn() -> I>,
}

impl<I> ConstraintValidator<I> {
    /// Creates a validator rendering messages from `registry`.
    pub fn new(registry: &'static ConstraintRegistry) -> Self {
        Self {
            registry,
            _marker: PhantomData,
        }
    }
}

impl<I: Bindable> Validator for ConstraintValidator<I> {
    fn supports(&self, target: TypeId) -> bool {
        target == TypeId::of::<I>()
    }

    fn validate(&self, target: &dyn Any, errors: &mut Errors, groups: &Groups) {
        let Some(target) = target.downcast_ref::<I>() else {
            return;
        };

        for field in I::descriptor().fields() {
            if errors.has_field_errors(field.name) {
                trace!(field = field.name, "Skipping constraints on rejected field");
                continue;
            }
            let Some(value) = target.field_value(field.name) else {
                continue;
            };

            for constraint in &field.constraints {
                if !constraint.applies_to(groups) || constraint.is_satisfied_by(&value) {
                    continue;
                }
                let message = self.registry.message_for(constraint);
                match rejected_value(&value) {
                    Some(rejected) => {
                        errors.reject_value_with(field.name, constraint.code(), message, rejected)
                    }
                    None => errors.reject_value(field.name, constraint.code(), message),
                }
            }
        }
    }
}

fn rejected_value(value: &ConstraintValue<'_>) -> Option<Value> {
    match *value {
        ConstraintValue::Absent => Some(Value::Null),
        ConstraintValue::Text(s) => Some(Value::from(s)),
        ConstraintValue::Integer(n) => Some(integer_value(n)),
        ConstraintValue::Float(f) => Some(Value::from(f)),
        ConstraintValue::Bool(b) => Some(Value::from(b)),
        ConstraintValue::Other => None,
    }
}

/// Exact JSON number when one fits, else the decimal string.
fn integer_value(n: i128) -> Value {
    if let Ok(n) = i64::try_from(n) {
        Value::from(n)
    } else if let Ok(n) = u64::try_from(n) {
        Value::from(n)
    } else {
        Value::from(n.to_string())
    }
}
