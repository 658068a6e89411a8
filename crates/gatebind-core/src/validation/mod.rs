//! Validation layer - targets, constraints and the error model.
//!
//! - [`Bindable`] - the typed request object contract (usually derived)
//! - [`FromFieldValue`] / [`AsConstraintValue`] - coercion in and inspection out
//! - [`Constraint`] / [`TargetDescriptor`] - declarative rules, compiled once per type
//! - [`Validator`] / [`Validate`] - the pluggable validation capability
//! - [`Errors`] / [`BindingResult`] - the error sink and the frozen outcome

pub mod constraint;
pub mod errors;
pub mod groups;
pub mod target;
pub mod validate;
pub mod value;

pub use constraint::{Constraint, ConstraintKind, FieldDescriptor, TargetDescriptor};
pub use errors::{BindingResult, Errors, FieldError};
pub use groups::{DEFAULT_GROUP, Groups};
pub use target::{Bindable, FieldBinding};
pub use validate::{SelfValidator, Validate, Validator};
pub use value::{
    AsConstraintValue, ConstraintValue, FieldValue, FromFieldValue, bind_value, kind_name,
};
