use gatebind::framework::MALFORMED_BODY;
use gatebind::prelude::*;
use sample_function::{
    INVALID_DATE, INVALID_DATE_MESSAGE, SampleFunction, SampleInput, local_now,
};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

fn dispatcher() -> Dispatcher<SampleFunction> {
    Dispatcher::new(SampleFunction::default())
}

fn ctx() -> InvocationContext {
    InvocationContext::new("test-request")
}

async fn call(dispatcher: &Dispatcher<SampleFunction>, event: GatewayEvent) -> (u16, Value) {
    let response = dispatcher.handle(&event, &ctx()).await;
    let body = serde_json::from_str(&response.body).unwrap();
    (response.status_code, body)
}

fn errors_on<'a>(body: &'a Value, field: &str) -> Vec<&'a Value> {
    body.as_array()
        .unwrap()
        .iter()
        .filter(|e| e["field"] == field)
        .collect()
}

#[tokio::test]
async fn test_valid_input_echoes_with_current_time() {
    let event = GatewayEvent::new().json_body(&json!({ "test": "hello", "date": "2019/07/01" }));
    let before = OffsetDateTime::now_utc();

    let (status, body) = call(&dispatcher(), event).await;

    assert_eq!(status, 200);
    assert_eq!(body["test"], "hello");
    let date = OffsetDateTime::parse(body["date"].as_str().unwrap(), &Rfc3339).unwrap();
    assert!(date >= before);
}

#[tokio::test]
async fn test_blank_test_is_rejected() {
    let event = GatewayEvent::new().json_body(&json!({ "test": "", "date": "2019/07/01" }));

    let (status, body) = call(&dispatcher(), event).await;

    assert_eq!(status, 400);
    let errors = errors_on(&body, "test");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["code"], "NotBlank");
    assert_eq!(errors[0]["objectName"], "SampleInput");
    assert!(errors_on(&body, "date").is_empty());
}

#[tokio::test]
async fn test_future_date_is_rejected() {
    let event = GatewayEvent::new().json_body(&json!({ "test": "hello", "date": "2999/01/01" }));

    let (status, body) = call(&dispatcher(), event).await;

    assert_eq!(status, 400);
    let errors = errors_on(&body, "date");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["code"], INVALID_DATE);
    assert_eq!(errors[0]["message"], INVALID_DATE_MESSAGE);
    assert_eq!(errors[0]["rejectedValue"], "2999/01/01");
}

#[tokio::test]
async fn test_unparseable_date_yields_one_error() {
    let event = GatewayEvent::new().json_body(&json!({ "test": "hello", "date": "2019-07-01" }));

    let (status, body) = call(&dispatcher(), event).await;

    assert_eq!(status, 400);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(errors_on(&body, "date").len(), 1);
}

#[tokio::test]
async fn test_body_overrides_query_overrides_path() {
    let event = GatewayEvent::new()
        .path_param("test", "from-path")
        .path_param("date", "2019/07/01")
        .query_param("test", "from-query")
        .json_body(&json!({ "test": "from-body" }));
    let (status, body) = call(&dispatcher(), event).await;
    assert_eq!(status, 200);
    assert_eq!(body["test"], "from-body");

    let event = GatewayEvent::new()
        .path_param("test", "from-path")
        .query_param("test", "from-query")
        .query_param("date", "2019/07/01");
    let (status, body) = call(&dispatcher(), event).await;
    assert_eq!(status, 200);
    assert_eq!(body["test"], "from-query");
}

#[tokio::test]
async fn test_missing_body_binds_from_parameters() {
    let event = GatewayEvent::new()
        .query_param("test", "hi")
        .query_param("date", "2020/02/29");

    let (status, body) = call(&dispatcher(), event).await;

    assert_eq!(status, 200);
    assert_eq!(body["test"], "hi");
}

#[tokio::test]
async fn test_empty_event_reports_both_fields() {
    let (status, body) = call(&dispatcher(), GatewayEvent::new()).await;

    assert_eq!(status, 400);
    assert_eq!(errors_on(&body, "test").len(), 1);
    assert_eq!(errors_on(&body, "date").len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_server_error_by_default() {
    let event = GatewayEvent::new().body("{not json");

    let (status, body) = call(&dispatcher(), event).await;

    assert_eq!(status, 500);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_body_as_client_error() {
    let dispatcher = Dispatcher::builder(SampleFunction::default())
        .bind_failure_status(BindFailureStatus::ClientError)
        .build();
    let event = GatewayEvent::new().body("{not json");

    let (status, body) = call(&dispatcher, event).await;

    assert_eq!(status, 400);
    let errors = errors_on(&body, "body");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["code"], MALFORMED_BODY);
    assert_eq!(errors[0]["rejectedValue"], "{not json");
}

#[tokio::test]
async fn test_repeated_invocations_are_independent() {
    let dispatcher = dispatcher();
    let bad = GatewayEvent::new().json_body(&json!({ "test": "", "date": "2019/07/01" }));
    let good = GatewayEvent::new().json_body(&json!({ "test": "again", "date": "2019/07/01" }));

    let first = call(&dispatcher, bad.clone()).await;
    let (status, body) = call(&dispatcher, good).await;
    let third = call(&dispatcher, bad).await;

    assert_eq!(status, 200);
    assert_eq!(body["test"], "again");
    assert_eq!(first, third);
}

#[test]
fn test_self_validation_skips_blank_date() {
    let input = SampleInput {
        test: "hello".into(),
        date: "  ".into(),
    };
    let mut errors = Errors::new("SampleInput");

    input.validate(&mut errors, &Groups::DEFAULT);

    assert!(!errors.has_errors());
}

fn slash_date(date: time::Date) -> String {
    format!(
        "{:04}/{:02}/{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn self_check(date: String) -> Errors {
    let input = SampleInput {
        test: "hello".into(),
        date,
    };
    let mut errors = Errors::new("SampleInput");
    input.validate(&mut errors, &Groups::DEFAULT);
    errors
}

#[test]
fn test_local_today_is_not_in_the_future() {
    let today = local_now().date();
    assert!(!self_check(slash_date(today)).has_errors());
}

#[test]
fn test_local_tomorrow_is_in_the_future() {
    let tomorrow = local_now().date().next_day().unwrap();
    let errors = self_check(slash_date(tomorrow));
    assert!(errors.has_field_errors("date"));
    assert_eq!(errors.error_count(), 1);
}
