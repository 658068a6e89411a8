//! The business plug-in point.
//!
//! An [`Action`] receives the bound target together with the validation outcome
//! and returns an [`ActionResult`]. By contract it answers [`bad`] when the
//! outcome has errors and runs its business logic otherwise:
//!
//! ```rust,ignore
//! #[async_trait]
//! impl Action for CreateUser {
//!     type Input = CreateUserInput;
//!     type Output = User;
//!
//!     async fn action(
//!         &self,
//!         input: CreateUserInput,
//!         outcome: BindingResult,
//!         _ctx: &InvocationContext,
//!     ) -> Result<ActionResult<User>, BoxError> {
//!         if outcome.has_errors() {
//!             return Ok(bad(outcome));
//!         }
//!         Ok(ok(self.users.create(input).await?))
//!     }
//! }
//! ```

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;

use gatebind_core::{
    ActionResult, Bindable, BindingResult, Groups, Headers, InvocationContext, Validate,
};

use crate::error::BoxError;

/// A typed operation dispatched once per invocation.
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// The request target bound from the event.
    type Input: Bindable + Validate;

    /// The success payload.
    type Output: Serialize + Send + 'static;

    /// Validation groups declared by this operation; [`Groups::DEFAULT`] unless overridden.
    fn validation_groups() -> Groups {
        Groups::DEFAULT
    }

    /// Runs the operation.
    async fn action(
        &self,
        input: Self::Input,
        outcome: BindingResult,
        ctx: &InvocationContext,
    ) -> Result<ActionResult<Self::Output>, BoxError>;
}

/// A 200 result carrying `entity`.
pub fn ok<T>(entity: T) -> ActionResult<T> {
    ActionResult::success(entity)
}

/// A 200 result carrying `entity` and `headers`.
pub fn ok_with_headers<T>(entity: T, headers: Headers) -> ActionResult<T> {
    ActionResult::success_with_headers(entity, headers)
}

/// A 400 result carrying every field error of `outcome`.
pub fn bad<T>(outcome: BindingResult) -> ActionResult<T> {
    ActionResult::bad_request(outcome)
}

/// An [`Action`] backed by an async closure.
pub struct ActionFn<I, O, F> {
    func: F,
    _marker: PhantomData<fn(I) -> O>,
}

/// Wraps `func` as an [`Action`].
///
/// The closure receives an owned copy of the invocation context so the
/// returned future does not borrow from the caller.
pub fn action_fn<I, O, F, Fut>(func: F) -> ActionFn<I, O, F>
where
    F: Fn(I, BindingResult, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ActionResult<O>, BoxError>> + Send + 'static,
{
    ActionFn {
        func,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<I, O, F, Fut> Action for ActionFn<I, O, F>
where
    I: Bindable + Validate,
    O: Serialize + Send + 'static,
    F: Fn(I, BindingResult, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ActionResult<O>, BoxError>> + Send + 'static,
{
    type Input = I;
    type Output = O;

    async fn action(
        &self,
        input: I,
        outcome: BindingResult,
        ctx: &InvocationContext,
    ) -> Result<ActionResult<O>, BoxError> {
        (self.func)(input, outcome, ctx.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatebind_core::{Errors, FieldError};

    #[test]
    fn test_bad_keeps_every_error() {
        let mut errors = Errors::new("T");
        errors.reject_value("a", "NotBlank", "must not be blank");
        errors.reject_value("a", "Length", "too long");
        let result: ActionResult<()> = bad(errors.into_result());

        assert_eq!(result.status_code(), 400);
        let fields: Vec<&FieldError> = result.field_errors().unwrap().iter().collect();
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_ok_with_headers() {
        let headers: Headers = [("X-Trace", "1")].into_iter().collect();
        let result = ok_with_headers("done", headers);
        assert_eq!(result.status_code(), 200);
        assert_eq!(result.headers().get("X-Trace"), Some("1"));
    }
}
