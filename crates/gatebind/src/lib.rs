//! # Gatebind
//!
//! Bind, validate and dispatch API gateway events to strongly-typed handlers.
//!
//! ## Overview
//!
//! A handler declares its request type once. Gatebind merges the event's
//! path parameters, query parameters and JSON body into that type, runs the
//! declared constraints plus the type's own checks, and hands the action both
//! the populated value and the validation outcome. Whatever the action
//! returns is normalized into a gateway response.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌────────┐     ┌──────────────────┐
//! │   Runtime   │────▶│ Dispatcher │────▶│ Binder │────▶│      Action      │
//! │ (JSON lines)│◀────│  (states)  │     │ (+val) │     │ (business logic) │
//! └─────────────┘     └────────────┘     └────────┘     └──────────────────┘
//! ```
//!
//! - **Runtime**: Loads configuration, sets up logging, feeds events in
//! - **Dispatcher**: Drives one invocation from target creation to response
//! - **Binder**: Layers body over query over path, then validates
//! - **Action**: User code returning `ok(..)`, `bad(..)` or a failure
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gatebind::prelude::*;
//!
//! #[derive(Default, Bindable)]
//! struct Greet {
//!     #[validate(not_blank)]
//!     name: String,
//! }
//!
//! impl Validate for Greet {
//!     fn validate(&self, _errors: &mut Errors, _groups: &Groups) {}
//! }
//!
//! struct GreetAction;
//!
//! #[async_trait]
//! impl Action for GreetAction {
//!     type Input = Greet;
//!     type Output = String;
//!
//!     async fn action(
//!         &self,
//!         input: Greet,
//!         outcome: BindingResult,
//!         _ctx: &InvocationContext,
//!     ) -> Result<ActionResult<String>, BoxError> {
//!         if outcome.has_errors() {
//!             return Ok(bad(outcome));
//!         }
//!         Ok(ok(format!("hello {}", input.name)))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = GatewayRuntime::from_env(GreetAction)?;
//!     runtime
//!         .run_lines(tokio::io::BufReader::new(tokio::io::stdin()), tokio::io::stdout())
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `macros`: Enable the Bindable derive macro (default)
//! - `toml-config` / `yaml-config`: Configuration file formats
//! - `json-log`: JSON log output

pub use gatebind_core as core;
pub use gatebind_framework as framework;
#[cfg(feature = "macros")]
pub use gatebind_macros as macros;
pub use gatebind_runtime as runtime;

pub use async_trait::async_trait;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use gatebind::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use gatebind_runtime::GatewayRuntime;

    // Actions and dispatch
    pub use gatebind_framework::{
        Action, BindFailureStatus, BoxError, Dispatcher, action_fn, bad, ok, ok_with_headers,
    };

    // Request targets and validation
    pub use gatebind_core::{
        ActionResult, Bindable, BindingResult, Errors, FieldError, GatewayEvent, GatewayResponse,
        Groups, InvocationContext, Validate,
    };

    #[cfg(feature = "macros")]
    pub use gatebind_macros::Bindable;

    pub use async_trait::async_trait;
}
