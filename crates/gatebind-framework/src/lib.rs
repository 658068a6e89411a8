//! # Gatebind Framework
//!
//! The binding, validation and dispatch pipeline.
//!
//! This layer provides:
//! - [`Binder`] - merges path, query and body input into a typed target
//! - [`ConstraintValidator`] - checks `#[validate(...)]` constraints
//! - [`ConstraintRegistry`] - the process-wide message catalog
//! - [`Action`] - the business plug-in point, with [`ok`] / [`bad`] helpers
//! - [`Dispatcher`] - the per-invocation state machine, also a `tower::Service`
//!
//! The framework is transport agnostic: it consumes a
//! [`GatewayEvent`](gatebind_core::GatewayEvent) and produces a
//! [`GatewayResponse`](gatebind_core::GatewayResponse). Decoding raw events,
//! configuration and logging setup live in `gatebind-runtime`.

pub mod action;
pub mod binder;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod service;
pub mod validator;

pub use action::{Action, ActionFn, action_fn, bad, ok, ok_with_headers};
pub use binder::{Binder, BinderConfig, SourceKind, Sources, parse_body};
pub use dispatcher::{
    DispatchConfig, Dispatcher, DispatcherBuilder, Invocation, InvocationState, TargetFactory,
    respond,
};
pub use error::{BindFailureStatus, BoxError, DispatchError, DispatchResult, RegistryError};
pub use registry::{ConstraintRegistry, MALFORMED_BODY, TYPE_MISMATCH, UNKNOWN_FIELD};
pub use service::InvocationRequest;
pub use validator::ConstraintValidator;
