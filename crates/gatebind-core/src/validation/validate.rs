//! The validator capability set.
//!
//! - [`Validator`] is the object-safe capability the binder runs: it declares
//!   which target types it supports and reports failures into an [`Errors`]
//!   sink.
//! - [`Validate`] is what a concrete request type implements to express its own
//!   business rules. [`SelfValidator`] adapts it into a [`Validator`].
//!
//! # Example
//!
//! ```rust,ignore
//! impl Validate for SampleInput {
//!     fn validate(&self, errors: &mut Errors, _groups: &Groups) {
//!         if self.date.parse::<u32>().is_err() {
//!             errors.reject_value("date", "invalidDate", "bad date");
//!         }
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use super::errors::Errors;
use super::groups::Groups;

/// A validator that can be applied to targets of the types it supports.
pub trait Validator: Send + Sync {
    /// Returns `true` if values of type `target` can be validated.
    fn supports(&self, target: TypeId) -> bool;

    /// Validates `target`, appending failures to `errors`.
    ///
    /// Expected invalid input must be reported, never panicked on.
    fn validate(&self, target: &dyn Any, errors: &mut Errors, groups: &Groups);
}

/// Self-validation implemented by a request type.
///
/// Runs after the structural constraint pass. Takes `&self`: a validator never
/// mutates the target.
pub trait Validate {
    /// Appends failures for this value to `errors`.
    fn validate(&self, errors: &mut Errors, groups: &Groups);
}

/// Adapts a type's own [`Validate`] impl into a [`Validator`].
pub struct SelfValidator<I> {
    _marker: PhantomData<fn() -> I>,
}

impl<I> SelfValidator<I> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<I> Default for SelfValidator<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Validate + 'static> Validator for SelfValidator<I> {
    fn supports(&self, target: TypeId) -> bool {
        target == TypeId::of::<I>()
    }

    fn validate(&self, target: &dyn Any, errors: &mut Errors, groups: &Groups) {
        if let Some(target) = target.downcast_ref::<I>() {
            target.validate(errors, groups);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Positive(i32);

    impl Validate for Positive {
        fn validate(&self, errors: &mut Errors, _groups: &Groups) {
            if self.0 <= 0 {
                errors.reject_value("value", "positive", "must be positive");
            }
        }
    }

    #[test]
    fn test_supports_only_own_type() {
        let validator = SelfValidator::<Positive>::new();
        assert!(validator.supports(TypeId::of::<Positive>()));
        assert!(!validator.supports(TypeId::of::<i32>()));
    }

    #[test]
    fn test_validate_reports_into_sink() {
        let validator = SelfValidator::<Positive>::new();
        let mut errors = Errors::new("Positive");

        validator.validate(&Positive(-1), &mut errors, &Groups::DEFAULT);
        validator.validate(&Positive(5), &mut errors, &Groups::DEFAULT);

        assert_eq!(errors.error_count(), 1);
        assert!(errors.has_field_errors("value"));
    }

    #[test]
    fn test_unsupported_target_is_ignored() {
        let validator = SelfValidator::<Positive>::new();
        let mut errors = Errors::new("x");
        validator.validate(&"not positive", &mut errors, &Groups::DEFAULT);
        assert!(!errors.has_errors());
    }
}
