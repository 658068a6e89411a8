//! # Gatebind Core
//!
//! The data model of the gatebind binding pipeline.
//!
//! This crate defines everything that crosses a boundary: what the gateway
//! sends, what actions return, and what validators report. It contains no
//! pipeline logic; the binder and dispatcher live in `gatebind-framework`.
//!
//! ## Layers
//!
//! ### Foundation
//!
//! Gateway boundary types:
//! - [`GatewayEvent`] / [`InvocationContext`] - the inbound event
//! - [`GatewayResponse`] - the outbound response
//! - [`Headers`] - insertion-ordered header map
//!
//! ### Validation
//!
//! Typed targets and their error model:
//! - [`Bindable`] - request types populated from untyped sources
//! - [`Validator`] / [`Validate`] - validation capabilities
//! - [`Errors`] / [`BindingResult`] / [`FieldError`] - sink, outcome, item
//!
//! ### Result
//!
//! - [`ActionResult`] / [`Entity`] - the normalized status + headers + entity envelope
//!
//! ## Flow
//!
//! ```text
//! GatewayEvent ──▶ bind into Bindable ──▶ BindingResult ──▶ action ──▶ ActionResult ──▶ GatewayResponse
//! ```

pub mod error;
pub mod foundation;
pub mod result;
pub mod validation;

pub use error::{BindError, BindResult, CoercionError, CoercionResult, InstantiationError};
pub use foundation::{GatewayEvent, GatewayResponse, Headers, InvocationContext};
pub use result::{ActionResult, Entity, ErrorBody};
pub use validation::{
    AsConstraintValue, Bindable, BindingResult, Constraint, ConstraintKind, ConstraintValue,
    DEFAULT_GROUP, Errors, FieldBinding, FieldDescriptor, FieldError, FieldValue, FromFieldValue,
    Groups, SelfValidator, TargetDescriptor, Validate, Validator, bind_value, kind_name,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::*;
    pub use super::result::{ActionResult, Entity};
    pub use super::validation::{
        Bindable, BindingResult, Errors, FieldError, Groups, Validate, Validator,
    };
}
