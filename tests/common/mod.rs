//! Mock target and transform services for pipeline tests.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::Response,
    Json, Router,
};
use llsed_lib::models::TransformRule;
use llsed_lib::proxy::rpc::TransformClient;
use llsed_lib::proxy::upstream::UpstreamClient;
use llsed_lib::proxy::{build_router, AppState, ProxyEngine, RuleStore};
use llsed_lib::utils::http::create_client;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// One request as seen by a mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    async fn record(&self, request: Request) -> Recorded {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let recorded = Recorded {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            body,
        };
        self.requests.lock().unwrap().push(recorded.clone());
        self.calls.fetch_add(1, Ordering::SeqCst);
        recorded
    }
}

pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// An address nothing listens on.
pub fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/rpc", addr)
}

#[derive(Clone)]
struct Canned {
    recorder: Recorder,
    status: StatusCode,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static str,
}

async fn canned_reply(State(canned): State<Canned>, request: Request) -> Response {
    canned.recorder.record(request).await;

    let mut response = Response::new(Body::from(canned.body));
    *response.status_mut() = canned.status;
    for (name, value) in canned.headers {
        response.headers_mut().append(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}

/// Target server answering every request with the same canned response.
pub async fn target_server(
    status: StatusCode,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static str,
) -> (String, Recorder) {
    let recorder = Recorder::default();
    let state = Canned {
        recorder: recorder.clone(),
        status,
        headers,
        body,
    };
    let app = Router::new().fallback(canned_reply).with_state(state);
    (spawn(app).await, recorder)
}

/// Target returning `{"answer":42}` as JSON.
pub async fn json_target() -> (String, Recorder) {
    target_server(
        StatusCode::OK,
        vec![("content-type", "application/json")],
        r#"{"answer":42}"#,
    )
    .await
}

#[derive(Clone)]
struct Stall {
    recorder: Recorder,
    delay: Duration,
}

async fn stalled_reply(State(stall): State<Stall>, request: Request) -> Json<Value> {
    stall.recorder.record(request).await;
    tokio::time::sleep(stall.delay).await;
    Json(json!({"late": true}))
}

/// Target that records the request, then waits `delay` before answering.
pub async fn stalled_target(delay: Duration) -> (String, Recorder) {
    let recorder = Recorder::default();
    let state = Stall {
        recorder: recorder.clone(),
        delay,
    };
    let app = Router::new().fallback(stalled_reply).with_state(state);
    (spawn(app).await, recorder)
}

#[derive(Clone)]
struct Rpc {
    recorder: Recorder,
    reply: fn(&Value) -> Value,
}

async fn rpc_reply(State(rpc): State<Rpc>, request: Request) -> Json<Value> {
    let recorded = rpc.recorder.record(request).await;
    Json((rpc.reply)(&recorded.json()))
}

/// Transform service whose reply envelope is computed from the request envelope.
pub async fn transform_server(reply: fn(&Value) -> Value) -> (String, Recorder) {
    let recorder = Recorder::default();
    let state = Rpc {
        recorder: recorder.clone(),
        reply,
    };
    let app = Router::new().fallback(rpc_reply).with_state(state);
    (format!("{}/rpc", spawn(app).await), recorder)
}

/// Success envelope echoing params with `marker` set to `value`.
pub fn mark(envelope: &Value, marker: &str, value: &str) -> Value {
    let mut result = envelope["params"].clone();
    result[marker] = json!(value);
    json!({"jsonrpc": "2.0", "result": result, "id": envelope["id"]})
}

pub fn rule(tag: &str, pre: Option<&str>, post: Option<&str>) -> TransformRule {
    TransformRule {
        tag: tag.to_string(),
        from: "openai".to_string(),
        to: "anthropic".to_string(),
        params: Map::new(),
        pre: pre.map(str::to_string),
        post: post.map(str::to_string),
    }
}

pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

pub fn proxy(rules: Vec<TransformRule>, target: &str) -> Router {
    let client = create_client(None, None).unwrap();
    proxy_with(rules, target, client, DEFAULT_BODY_LIMIT)
}

/// Proxy router with an explicit HTTP client and inbound body limit.
pub fn proxy_with(
    rules: Vec<TransformRule>,
    target: &str,
    client: reqwest::Client,
    max_body_size: usize,
) -> Router {
    let engine = ProxyEngine::new(
        RuleStore::new(rules),
        TransformClient::new(client.clone()),
        UpstreamClient::new(client, target),
    );
    build_router(AppState::new(engine, max_body_size))
}

pub struct ProxyReply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ProxyReply {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> ProxyReply {
    let mut builder = axum::http::Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    ProxyReply {
        status,
        headers,
        body,
    }
}
