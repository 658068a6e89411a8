//! Sample Function
//!
//! Echoes a `test` string back with the current time, after checking that a
//! `date` in `yyyy/MM/dd` form is present and not in the future.
//!
//! ```text
//! {"test": "hello", "date": "2019/07/01"}  ──▶ 200 {"test": "hello", "date": "<now>"}
//! {"test": "",      "date": "2019/07/01"}  ──▶ 400 [{ "field": "test", ... }]
//! {"test": "hello", "date": "2999/01/01"}  ──▶ 400 [{ "field": "date", ... }]
//! ```

use gatebind::prelude::*;
use serde::Serialize;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::debug;

/// Message reported for an unusable `date`.
pub const INVALID_DATE_MESSAGE: &str = "日付指定が正しくありません。";

/// Code reported for an unusable `date`.
pub const INVALID_DATE: &str = "invalidDate";

// ============================================================================
// Request / response
// ============================================================================

#[derive(Debug, Default, Clone, Bindable)]
#[bindable(crate = "gatebind::core")]
pub struct SampleInput {
    #[validate(not_blank)]
    pub test: String,

    /// Expected as `yyyy/MM/dd`.
    #[validate(not_blank)]
    pub date: String,
}

/// The current time at the local offset, or UTC when the offset is unknown.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

impl SampleInput {
    fn parsed_date(&self) -> Option<Date> {
        let format = format_description!("[year]/[month]/[day]");
        Date::parse(self.date.trim(), &format).ok()
    }
}

impl Validate for SampleInput {
    fn validate(&self, errors: &mut Errors, _groups: &Groups) {
        // Blank dates are already reported by `not_blank`.
        if self.date.trim().is_empty() {
            return;
        }

        let today = local_now().date();
        match self.parsed_date() {
            Some(date) if date <= today => {}
            _ => errors.reject_value_with(
                "date",
                INVALID_DATE,
                INVALID_DATE_MESSAGE,
                self.date.clone().into(),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleOutput {
    pub test: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

// ============================================================================
// Service
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct SampleService;

impl SampleService {
    pub fn execute(&self, request: SampleInput) -> SampleOutput {
        SampleOutput {
            test: request.test,
            date: local_now(),
        }
    }
}

// ============================================================================
// Function
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct SampleFunction {
    service: SampleService,
}

#[async_trait]
impl Action for SampleFunction {
    type Input = SampleInput;
    type Output = SampleOutput;

    async fn action(
        &self,
        input: SampleInput,
        outcome: BindingResult,
        ctx: &InvocationContext,
    ) -> Result<ActionResult<SampleOutput>, BoxError> {
        if outcome.has_errors() {
            return Ok(bad(outcome));
        }

        debug!(request_id = %ctx.request_id, "Running sample service");
        Ok(ok(self.service.execute(input)))
    }
}
