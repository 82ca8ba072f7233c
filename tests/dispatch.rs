//! End-to-end dispatch tests.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::{json, Value};

use event_dispatch::config::{DispatchConfig, StaticEnvironment};
use event_dispatch::error::AppError;
use event_dispatch::events::SourceKind;
use event_dispatch::observability::LogStatus;
use event_dispatch::pipeline::guards::expected_environment;
use event_dispatch::pipeline::{
    Dispatcher, HandlerOutcome, HttpStatusCode, InvocationContext, PipelineHooks, Request,
    ResponseBody,
};
use event_dispatch::routing::{RouteTable, NO_ROUTE_SYMBOL};

mod common;

#[test]
fn test_symbolic_route_renders_handler_value() {
    let mut table = RouteTable::new();
    table.route("hello", "hello", common::hello);

    let response = common::run(table, &common::storage_event(&["hello.bucket"]), &PipelineHooks::default());
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"hello":"world"}"#);
    assert_eq!(response.headers["Content-Type"], "application/json");
    assert!(response.multi_value_headers.is_empty());
}

#[test]
fn test_unmatched_kind_renders_no_route() {
    let mut table = RouteTable::new();
    table.route("hello", "hello", common::hello);

    let response = common::run(table, &common::bus_event("bad_route", json!({})), &PipelineHooks::default());
    assert_eq!(response.status_code, 404);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["error"], "no matching route");
    assert_eq!(body["code"], 404);
}

#[test]
fn test_unrecognised_event_routes_to_no_route() {
    let response = common::run(RouteTable::new(), &json!({"unexpected": 1}), &PipelineHooks::default());
    assert_eq!(response.status_code, 404);
}

#[test]
fn test_registered_no_route_handler_takes_precedence() {
    let mut table = RouteTable::new();
    table.route(NO_ROUTE_SYMBOL, "custom_no_route", |req: Request| {
        req.respond(HandlerOutcome::Success(ResponseBody::json(json!({"routed": false}))))
    });

    let response = common::run(table, &common::bus_event("nothing", json!({})), &PipelineHooks::default());
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"routed":false}"#);
}

#[test]
fn test_guard_rejection_skips_handler() {
    let (table, calls) = common::counting_table("hello");
    let hooks = PipelineHooks::default()
        .with_guard(|req, _env| req.fail(AppError::admission("Unauthorised", 401)));

    let response = common::run(table, &common::bus_event("hello", json!({})), &hooks);
    assert_eq!(response.status_code, 401);
    assert!(response.body.contains("Unauthorised"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_admitted_request_runs_handler_once() {
    let (table, calls) = common::counting_table("hello");
    let response = common::run(table, &common::bus_event("hello", json!({})), &PipelineHooks::default());
    assert_eq!(response.status_code, 200);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_expected_environment_guard() {
    let (table, calls) = common::counting_table("hello");
    let dispatcher = Dispatcher::new(Arc::new(table), DispatchConfig::default());
    let hooks = PipelineHooks::default().with_guard(expected_environment);
    let env = StaticEnvironment::new("test").expect("REGION");

    let response = dispatcher.run(
        &common::bus_event("hello", json!({})),
        InvocationContext::default(),
        &env,
        &hooks,
        None,
    );
    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("Env expectations failure"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_gateway_path_params_and_created_status() {
    let mut table = RouteTable::new();
    table.route(("API", "POST", "/resource/{id}"), "create", |req: Request| {
        let id = req
            .event
            .gateway()
            .map(|g| g.path_params["id"].clone())
            .unwrap_or_default();
        req.with_status(HttpStatusCode::Created)
            .respond(HandlerOutcome::Success(ResponseBody::json(json!({ "id": id }))))
    });

    let raw = common::gateway_event("POST", "/resource/abc", json!({}));
    let response = common::run(table, &raw, &PipelineHooks::default());
    assert_eq!(response.status_code, 201);
    assert_eq!(response.body, r#"{"id":"abc"}"#);
}

#[test]
fn test_session_cookie_returned() {
    let mut table = RouteTable::new();
    table.route(("API", "GET", "/me"), "me", common::hello);

    let raw = common::gateway_event("GET", "/me", json!({"Cookie": "session=abc; theme=dark"}));
    let response = common::run(table, &raw, &PipelineHooks::default());
    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.multi_value_headers["Set-Cookie"],
        vec!["session=abc".to_string(), "theme=dark".to_string()]
    );
}

#[test]
fn test_cleared_session_not_returned() {
    let mut table = RouteTable::new();
    table.route(("API", "GET", "/logout"), "logout", |mut req: Request| {
        if let Some(gateway) = req.event.gateway_mut() {
            gateway.clear_session();
        }
        common::hello(req)
    });

    let raw = common::gateway_event("GET", "/logout", json!({"Cookie": "session=abc"}));
    let response = common::run(table, &raw, &PipelineHooks::default());
    assert!(response.multi_value_headers.is_empty());
}

#[test]
fn test_business_failure_renders_error_code() {
    let mut table = RouteTable::new();
    table.route("orders", "orders", |req: Request| {
        req.respond(HandlerOutcome::Failure(
            AppError::business("order exists", 409).with_step("persist"),
        ))
    });

    let response = common::run(table, &common::bus_event("orders", json!({})), &PipelineHooks::default());
    assert_eq!(response.status_code, 409);
    assert_eq!(
        response.body,
        r#"{"error":"order exists","code":409,"step":"persist","ctx":{}}"#
    );
}

#[test]
fn test_params_transform_failure() {
    let (table, calls) = common::counting_table("hello");
    let hooks = PipelineHooks::default()
        .with_params_transform(|req| req.fail(AppError::new("invalid params").with_code(400)));

    let response = common::run(table, &common::bus_event("hello", json!({})), &hooks);
    assert_eq!(response.status_code, 400);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_policy_point_visible_to_handler() {
    let mut table = RouteTable::new();
    table.route("hello", "hello", |req: Request| {
        let role = req.policy_info.clone().unwrap_or(Value::Null);
        req.respond(HandlerOutcome::Success(ResponseBody::json(json!({ "role": role }))))
    });
    let hooks = PipelineHooks::default().with_policy_point(|mut req| {
        req.policy_info = Some(json!("reader"));
        req
    });

    let response = common::run(table, &common::bus_event("hello", json!({})), &hooks);
    assert_eq!(response.body, r#"{"role":"reader"}"#);
}

#[test]
fn test_malformed_event_is_bootstrap_error() {
    let sink = Arc::new(common::RecordingSink::default());
    let dispatcher = Dispatcher::new(Arc::new(RouteTable::new()), DispatchConfig::default())
        .with_sink(sink.clone());

    let response = dispatcher.run(
        &json!({"Records": "not-a-list"}),
        InvocationContext::default(),
        &StaticEnvironment::new("test"),
        &PipelineHooks::default(),
        None,
    );
    assert_eq!(response.status_code, 400);
    assert!(response.headers.is_empty());
    assert_eq!(sink.messages(), vec!["End Handler--with base Error".to_string()]);
}

#[test]
fn test_source_hint_bypasses_detection() {
    let mut table = RouteTable::new();
    table.route("hello", "hello", common::hello);
    let dispatcher = Dispatcher::new(Arc::new(table), DispatchConfig::default());

    let raw = json!({"Records": [], "source": "bus", "detail-type": "hello"});
    let response = dispatcher.run(
        &raw,
        InvocationContext::default(),
        &StaticEnvironment::new("test"),
        &PipelineHooks::default(),
        Some(SourceKind::EventBus),
    );
    assert_eq!(response.status_code, 200);
}

#[test]
fn test_start_and_end_records() {
    let mut table = RouteTable::new();
    table.route("hello", "hello", common::hello);
    let sink = Arc::new(common::RecordingSink::default());
    let dispatcher =
        Dispatcher::new(Arc::new(table), DispatchConfig::default()).with_sink(sink.clone());

    dispatcher.run(
        &common::bus_event("hello", json!({})),
        InvocationContext::new("req-9"),
        &StaticEnvironment::new("test"),
        &PipelineHooks::default(),
        None,
    );

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].0, "Start Handler");
    assert_eq!(records[0].1["event"], "EventBusEvent:hello");
    assert_eq!(records[1].0, "End Handler");
    assert_eq!(records[1].2, LogStatus::Ok);
}

#[test]
fn test_multi_container_batch_is_no_route() {
    let mut table = RouteTable::new();
    table.route("hello", "hello", common::hello);

    let raw = common::storage_event(&["hello.a", "other.b"]);
    let response = common::run(table, &raw, &PipelineHooks::default());
    assert_eq!(response.status_code, 404);
}
