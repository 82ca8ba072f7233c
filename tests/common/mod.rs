//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use event_dispatch::config::{DispatchConfig, StaticEnvironment};
use event_dispatch::observability::{LogLevel, LogSink, LogStatus, TraceSpan};
use event_dispatch::pipeline::{
    Dispatcher, HandlerOutcome, InvocationContext, PipelineHooks, Request, ResponseBody,
};
use event_dispatch::routing::RouteTable;
use event_dispatch::DispatchResponse;

/// Storage-change notification touching one object per container.
pub fn storage_event(containers: &[&str]) -> Value {
    let records: Vec<Value> = containers
        .iter()
        .map(|c| json!({"s3": {"bucket": {"name": c}, "object": {"key": "hello_file.json"}}}))
        .collect();
    json!({ "Records": records })
}

pub fn gateway_event(method: &str, path: &str, headers: Value) -> Value {
    json!({
        "httpMethod": method,
        "path": path,
        "headers": headers,
        "queryStringParameters": null,
        "body": null,
        "isBase64Encoded": false
    })
}

pub fn bus_event(detail_type: &str, detail: Value) -> Value {
    json!({"source": "bus", "detail-type": detail_type, "detail": detail})
}

/// Handler answering `{"hello": "world"}`.
pub fn hello(request: Request) -> event_dispatch::pipeline::PipelineOutcome {
    request.respond(HandlerOutcome::Success(ResponseBody::json(json!({"hello": "world"}))))
}

/// Counts how many times the wrapped handler ran.
pub fn counting_table(pattern: &str) -> (RouteTable, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut table = RouteTable::new();
    table.route(pattern, "counted", move |request: Request| {
        counter.fetch_add(1, Ordering::SeqCst);
        hello(request)
    });
    (table, calls)
}

pub fn run(table: RouteTable, raw: &Value, hooks: &PipelineHooks) -> DispatchResponse {
    Dispatcher::new(Arc::new(table), DispatchConfig::default()).run(
        raw,
        InvocationContext::new("integration"),
        &StaticEnvironment::new("test"),
        hooks,
        None,
    )
}

/// Sink that keeps every record for inspection.
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<(String, Map<String, Value>, LogStatus)>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _, _)| m.clone())
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn log(
        &self,
        _level: LogLevel,
        message: &str,
        ctx: &Map<String, Value>,
        _span: Option<&TraceSpan>,
        status: LogStatus,
    ) {
        self.records
            .lock()
            .unwrap()
            .push((message.to_string(), ctx.clone(), status));
    }
}
