//! `tower::Service` adapter for [`Dispatcher`].
//!
//! A dispatcher is already a one-request-one-response function, so it maps
//! directly onto [`Service`]. The error type is [`Infallible`]: every failure
//! has been turned into a response before the future resolves.
//!
//! ```rust,ignore
//! use tower::ServiceExt;
//!
//! let response = Dispatcher::new(SampleFunction::default())
//!     .oneshot(InvocationRequest::new(event, ctx))
//!     .await?;
//! ```

use std::convert::Infallible;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tower::Service;

use gatebind_core::{GatewayEvent, GatewayResponse, InvocationContext};

use crate::action::Action;
use crate::dispatcher::Dispatcher;

/// One inbound event plus its invocation context.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub event: GatewayEvent,
    pub context: InvocationContext,
}

impl InvocationRequest {
    pub fn new(event: GatewayEvent, context: InvocationContext) -> Self {
        Self { event, context }
    }
}

impl From<(GatewayEvent, InvocationContext)> for InvocationRequest {
    fn from((event, context): (GatewayEvent, InvocationContext)) -> Self {
        Self::new(event, context)
    }
}

impl<A: Action> Service<InvocationRequest> for Dispatcher<A> {
    type Response = GatewayResponse;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<GatewayResponse, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: InvocationRequest) -> Self::Future {
        let dispatcher = self.clone();
        Box::pin(async move {
            Ok(dispatcher
                .handle(&request.event, &request.context)
                .await)
        })
    }
}
