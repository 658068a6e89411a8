//! The per-invocation pipeline.
//!
//! [`Dispatcher`] owns one [`Action`] and turns each inbound event into exactly
//! one [`GatewayResponse`]:
//!
//! ```text
//! Created ──▶ TargetInstantiated ──▶ Bound ──▶ Dispatched ──▶ Responded
//!    └──────────────┴──────────────────┴──────────┴──────────▶ Failed
//! ```
//!
//! Every failure, including a panic inside the action, is caught once at the
//! end of [`Invocation::run`] and converted into a response. Nothing escapes.
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::builder(SampleFunction::default())
//!     .bind_failure_status(BindFailureStatus::ClientError)
//!     .build();
//!
//! let response = dispatcher.handle(&event, &InvocationContext::new("req-1")).await;
//! ```

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, error, info_span};

use gatebind_core::{
    ActionResult, BindError, BindResult, Bindable, BindingResult, FieldError, GatewayEvent,
    GatewayResponse, Groups, InstantiationError, InvocationContext, Validator,
};

use crate::action::Action;
use crate::binder::{Binder, BinderConfig};
use crate::error::{BindFailureStatus, DispatchError, DispatchResult};
use crate::registry::{ConstraintRegistry, MALFORMED_BODY};

/// Produces a fresh zero-valued target for each invocation.
pub type TargetFactory<I> = Arc<dyn Fn() -> Result<I, InstantiationError> + Send + Sync>;

/// Dispatcher behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// How a malformed body is reported.
    pub bind_failure_status: BindFailureStatus,
    pub binder: BinderConfig,
}

// =============================================================================
// Dispatcher
// =============================================================================

struct Inner<A: Action> {
    action: A,
    factory: TargetFactory<A::Input>,
    binder: Binder,
    groups: Option<Groups>,
    bind_failure_status: BindFailureStatus,
}

/// Generic handler for one [`Action`].
///
/// Cheap to clone; clones share the action.
pub struct Dispatcher<A: Action> {
    inner: Arc<Inner<A>>,
}

impl<A: Action> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Action> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("action", &std::any::type_name::<A>())
            .field("groups", &self.resolve_validation_groups())
            .field("bind_failure_status", &self.inner.bind_failure_status)
            .field("binder", &self.inner.binder)
            .finish()
    }
}

impl<A> Dispatcher<A>
where
    A: Action,
    A::Input: Default,
{
    /// Creates a dispatcher with default settings.
    pub fn new(action: A) -> Self {
        Self::builder(action).build()
    }

    /// Starts a builder whose targets come from `Default`.
    pub fn builder(action: A) -> DispatcherBuilder<A> {
        DispatcherBuilder::new(action, Arc::new(|| Ok(A::Input::default())))
    }
}

impl<A: Action> Dispatcher<A> {
    /// Starts a builder with a custom target factory.
    pub fn with_factory<F>(action: A, factory: F) -> DispatcherBuilder<A>
    where
        F: Fn() -> Result<A::Input, InstantiationError> + Send + Sync + 'static,
    {
        DispatcherBuilder::new(action, Arc::new(factory))
    }

    pub fn action(&self) -> &A {
        &self.inner.action
    }

    pub fn bind_failure_status(&self) -> BindFailureStatus {
        self.inner.bind_failure_status
    }

    /// Groups configured on the dispatcher, else the ones the action declares.
    pub fn resolve_validation_groups(&self) -> Groups {
        self.inner.groups.unwrap_or_else(A::validation_groups)
    }

    /// Builds a fresh target.
    pub fn instantiate_target(&self) -> Result<A::Input, InstantiationError> {
        (self.inner.factory)()
    }

    /// Binds `event` into `target` and validates it.
    pub fn bind(
        &self,
        event: &GatewayEvent,
        target: &mut A::Input,
        groups: &Groups,
    ) -> BindResult<BindingResult> {
        self.inner.binder.bind(event, target, groups)
    }

    /// Prepares an invocation without running it.
    pub fn invocation<'a>(
        &'a self,
        event: &'a GatewayEvent,
        ctx: &'a InvocationContext,
    ) -> Invocation<'a, A> {
        Invocation {
            dispatcher: self,
            event,
            ctx,
            state: InvocationState::Created,
        }
    }

    /// Runs a full invocation. Always returns a response.
    pub async fn handle(&self, event: &GatewayEvent, ctx: &InvocationContext) -> GatewayResponse {
        self.invocation(event, ctx).run().await
    }
}

// =============================================================================
// DispatcherBuilder
// =============================================================================

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder<A: Action> {
    action: A,
    factory: TargetFactory<A::Input>,
    groups: Option<Groups>,
    config: DispatchConfig,
    registry: Option<&'static ConstraintRegistry>,
    validators: Vec<Arc<dyn Validator>>,
}

impl<A: Action> DispatcherBuilder<A> {
    fn new(action: A, factory: TargetFactory<A::Input>) -> Self {
        Self {
            action,
            factory,
            groups: None,
            config: DispatchConfig::default(),
            registry: None,
            validators: Vec::new(),
        }
    }

    /// Overrides the validation groups declared by the action.
    pub fn groups(mut self, groups: Groups) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Adds a validator run after the built-in passes.
    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn bind_failure_status(mut self, status: BindFailureStatus) -> Self {
        self.config.bind_failure_status = status;
        self
    }

    pub fn ignore_unknown_fields(mut self, ignore: bool) -> Self {
        self.config.binder.ignore_unknown_fields = ignore;
        self
    }

    /// Uses `registry` instead of the global one.
    pub fn registry(mut self, registry: &'static ConstraintRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces all switches at once.
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Dispatcher<A> {
        let registry = self.registry.unwrap_or_else(ConstraintRegistry::global);
        let binder = self
            .validators
            .into_iter()
            .fold(Binder::new(registry, self.config.binder), Binder::with_validator);

        Dispatcher {
            inner: Arc::new(Inner {
                action: self.action,
                factory: self.factory,
                binder,
                groups: self.groups,
                bind_failure_status: self.config.bind_failure_status,
            }),
        }
    }
}

// =============================================================================
// Invocation
// =============================================================================

/// Lifecycle state of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationState {
    Created,
    TargetInstantiated,
    Bound,
    Dispatched,
    Responded,
    Failed,
}

impl InvocationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Responded | Self::Failed)
    }
}

/// One event travelling through a [`Dispatcher`].
pub struct Invocation<'a, A: Action> {
    dispatcher: &'a Dispatcher<A>,
    event: &'a GatewayEvent,
    ctx: &'a InvocationContext,
    state: InvocationState,
}

impl<A: Action> Invocation<'_, A> {
    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Drives the invocation to a terminal state.
    pub async fn run(&mut self) -> GatewayResponse {
        let span = info_span!(
            "invocation",
            request_id = %self.ctx.request_id,
            action = std::any::type_name::<A>()
        );

        async {
            let outcome = AssertUnwindSafe(self.execute()).catch_unwind().await;
            match outcome {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => self.fail(err),
                Err(panic) => self.fail(DispatchError::Panic(panic_message(panic))),
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&mut self) -> DispatchResult<GatewayResponse> {
        let dispatcher = self.dispatcher;

        let mut target = dispatcher.instantiate_target()?;
        self.transition(InvocationState::TargetInstantiated);

        let groups = dispatcher.resolve_validation_groups();
        let outcome = dispatcher.bind(self.event, &mut target, &groups)?;
        debug!(errors = outcome.error_count(), "Validation finished");
        self.transition(InvocationState::Bound);

        let result = dispatcher
            .inner
            .action
            .action(target, outcome, self.ctx)
            .await
            .map_err(DispatchError::Action)?;
        self.transition(InvocationState::Dispatched);

        let response = respond(result)?;
        self.transition(InvocationState::Responded);
        Ok(response)
    }

    fn transition(&mut self, next: InvocationState) {
        debug!(from = ?self.state, to = ?next, "Invocation state changed");
        self.state = next;
    }

    fn fail(&mut self, err: DispatchError) -> GatewayResponse {
        self.transition(InvocationState::Failed);
        let policy = self.dispatcher.inner.bind_failure_status;
        error!(
            kind = err.kind(),
            status = err.status_code(policy),
            error = %err,
            "Invocation failed"
        );

        match (&err, policy) {
            (
                DispatchError::Bind(BindError::MalformedBody { reason }),
                BindFailureStatus::ClientError,
            ) => {
                let message = self
                    .dispatcher
                    .inner
                    .binder
                    .registry()
                    .render(MALFORMED_BODY, &[("reason", reason.clone())]);
                let field_error =
                    FieldError::new(A::Input::object_name(), "body", MALFORMED_BODY, message)
                        .rejected(self.event.body.clone().into());
                respond(ActionResult::<()>::bad_request(vec![field_error]))
                    .unwrap_or_else(|e| GatewayResponse::internal_error(&e.to_string()))
            }
            _ => GatewayResponse::internal_error(&err.to_string()),
        }
    }
}

/// Serializes an envelope into the gateway response shape.
pub fn respond<T: Serialize>(result: ActionResult<T>) -> DispatchResult<GatewayResponse> {
    let (status_code, headers, entity) = result.into_parts();
    let body = serde_json::to_string(&entity)?;
    Ok(GatewayResponse {
        status_code,
        headers,
        body,
        is_base64_encoded: false,
    })
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
