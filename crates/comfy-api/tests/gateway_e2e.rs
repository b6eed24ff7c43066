//! E2E tests for the gateway API
//!
//! The router is served on an ephemeral port and driven with reqwest.
//! Most tests use a counting mock backend; the full-stack tests at the end
//! put the real `ComfyClient` between the gateway and a fake ComfyUI server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::{get, post};
use axum::{Json, Router};
use comfy_api::{create_router, AppState};
use comfy_client::testing::TestServer;
use comfy_client::ComfyClient;
use comfy_core::{BackendError, BackendResult, PromptRequest, QueueProbe, WorkflowBackend};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinSet;

// =============================================================================
// Mock Backend
// =============================================================================

/// What every forwarding call on the mock returns
#[derive(Clone)]
enum Reply {
    Json(Value),
    Timeout,
    Unavailable(&'static str),
    Status(u16, &'static str),
    /// Submissions answer with a prompt id derived from the client id
    EchoClientId,
}

impl Reply {
    fn result(&self) -> BackendResult<Value> {
        match self.clone() {
            Reply::Json(v) => Ok(v),
            Reply::EchoClientId => Ok(json!({})),
            Reply::Timeout => Err(BackendError::Timeout),
            Reply::Unavailable(m) => Err(BackendError::Unavailable(m.to_string())),
            Reply::Status(status, body) => Err(BackendError::Status {
                status,
                body: body.to_string(),
            }),
        }
    }
}

/// Mock backend that records every call
struct MockBackend {
    reachable: bool,
    reply: Reply,
    probes: AtomicUsize,
    submits: Mutex<Vec<PromptRequest>>,
    history_ids: Mutex<Vec<String>>,
    interrupts: AtomicUsize,
    queues: AtomicUsize,
}

impl MockBackend {
    fn new(reply: Reply) -> Arc<Self> {
        Self::build(reply, true)
    }

    fn unreachable() -> Arc<Self> {
        Self::build(Reply::Unavailable("connection refused"), false)
    }

    fn build(reply: Reply, reachable: bool) -> Arc<Self> {
        Arc::new(Self {
            reachable,
            reply,
            probes: AtomicUsize::new(0),
            submits: Mutex::new(Vec::new()),
            history_ids: Mutex::new(Vec::new()),
            interrupts: AtomicUsize::new(0),
            queues: AtomicUsize::new(0),
        })
    }

    fn submit_count(&self) -> usize {
        self.submits.lock().unwrap().len()
    }

    fn outbound_calls(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
            + self.submit_count()
            + self.history_ids.lock().unwrap().len()
            + self.interrupts.load(Ordering::SeqCst)
            + self.queues.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkflowBackend for MockBackend {
    async fn probe_queue(&self) -> QueueProbe {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.reachable {
            QueueProbe::Reachable
        } else {
            QueueProbe::Unreachable {
                reason: "connection refused".to_string(),
            }
        }
    }

    async fn submit(&self, request: &PromptRequest) -> BackendResult<Value> {
        self.submits.lock().unwrap().push(request.clone());
        match self.reply {
            Reply::EchoClientId => Ok(json!({"prompt_id": format!("prompt-{}", request.client_id)})),
            _ => self.reply.result(),
        }
    }

    async fn history(&self, prompt_id: &str) -> BackendResult<Value> {
        self.history_ids.lock().unwrap().push(prompt_id.to_string());
        self.reply.result()
    }

    async fn interrupt(&self) -> BackendResult<()> {
        self.interrupts.fetch_add(1, Ordering::SeqCst);
        self.reply.result().map(|_| ())
    }

    async fn queue(&self) -> BackendResult<Value> {
        self.queues.fetch_add(1, Ordering::SeqCst);
        self.reply.result()
    }
}

async fn gateway(backend: Arc<MockBackend>) -> TestServer {
    TestServer::start(create_router(AppState::new(backend)))
        .await
        .unwrap()
}

async fn get_json(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let response = reqwest::get(server.url(path)).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn post_json(server: &TestServer, path: &str, body: &Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(server.url(path))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn post_empty(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(server.url(path))
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

fn sample_submission() -> Value {
    json!({
        "workflow": {"n1": {"inputs": {}, "class_type": "X"}},
        "client_id": "c1"
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reachable() {
    let server = gateway(MockBackend::new(Reply::Json(json!({})))).await;

    let (status, body) = get_json(&server, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "comfyui_service": "available"}));
}

#[tokio::test]
async fn test_health_unreachable() {
    let server = gateway(MockBackend::unreachable()).await;

    let (status, body) = get_json(&server, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({"status": "unhealthy", "detail": "ComfyUI service unavailable"})
    );
}

// =============================================================================
// Execute
// =============================================================================

#[tokio::test]
async fn test_execute_passes_prompt_id_through() {
    let backend = MockBackend::new(Reply::Json(json!({"prompt_id": "abc123"})));
    let server = gateway(backend.clone()).await;

    let (status, body) = post_json(&server, "/api/workflow/execute", &sample_submission()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prompt_id": "abc123"}));

    let submits = backend.submits.lock().unwrap();
    assert_eq!(submits[0].client_id, "c1");
    assert_eq!(
        Value::Object(submits[0].prompt.clone()),
        json!({"n1": {"inputs": {}, "class_type": "X"}})
    );
}

#[tokio::test]
async fn test_execute_forwards_extra_response_fields() {
    let reply = json!({"prompt_id": "abc123", "number": 4, "node_errors": {}});
    let server = gateway(MockBackend::new(Reply::Json(reply.clone()))).await;

    let (_, body) = post_json(&server, "/api/workflow/execute", &sample_submission()).await;
    assert_eq!(body, reply);
}

#[tokio::test]
async fn test_execute_defaults_client_id() {
    let backend = MockBackend::new(Reply::Json(json!({"prompt_id": "p"})));
    let server = gateway(backend.clone()).await;

    post_json(&server, "/api/workflow/execute", &json!({"workflow": {}})).await;
    assert_eq!(backend.submits.lock().unwrap()[0].client_id, "default_client");
}

#[tokio::test]
async fn test_execute_empty_client_id_uses_default() {
    let backend = MockBackend::new(Reply::Json(json!({"prompt_id": "p"})));
    let server = gateway(backend.clone()).await;

    let (status, _) = post_json(
        &server,
        "/api/workflow/execute",
        &json!({"workflow": {}, "client_id": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.submits.lock().unwrap()[0].client_id, "default_client");
}

#[tokio::test]
async fn test_execute_accepts_workflow_larger_than_default_body_limit() {
    let backend = MockBackend::new(Reply::Json(json!({"prompt_id": "big"})));
    let server = gateway(backend.clone()).await;

    let image = "x".repeat(3 * 1024 * 1024);
    let submission = json!({"workflow": {"n1": {"inputs": {"image": image}}}});

    let (status, body) = post_json(&server, "/api/workflow/execute", &submission).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prompt_id": "big"}));
    assert_eq!(backend.submit_count(), 1);

    let submits = backend.submits.lock().unwrap();
    assert_eq!(
        submits[0].prompt["n1"]["inputs"]["image"].as_str().map(str::len),
        Some(3 * 1024 * 1024)
    );
}

#[tokio::test]
async fn test_concurrent_executes_are_independent() {
    const REQUESTS: usize = 8;
    let backend = MockBackend::new(Reply::EchoClientId);
    let server = gateway(backend.clone()).await;
    let url = server.url("/api/workflow/execute");

    let mut tasks = JoinSet::new();
    for i in 0..REQUESTS {
        let url = url.clone();
        tasks.spawn(async move {
            let response = reqwest::Client::new()
                .post(url)
                .json(&json!({"workflow": {"n1": {}}, "client_id": format!("client-{i}")}))
                .send()
                .await
                .unwrap();
            let status = response.status();
            let body: Value = response.json().await.unwrap();
            (i, status, body)
        });
    }

    let mut seen = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (i, status, body) = joined.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"prompt_id": format!("prompt-client-{i}")}));
        seen.push(i);
    }
    seen.sort_unstable();

    assert_eq!(seen, (0..REQUESTS).collect::<Vec<_>>());
    assert_eq!(backend.submit_count(), REQUESTS);
}

#[tokio::test]
async fn test_execute_missing_workflow_makes_no_call() {
    let backend = MockBackend::new(Reply::Json(json!({"prompt_id": "p"})));
    let server = gateway(backend.clone()).await;

    let (status, body) =
        post_json(&server, "/api/workflow/execute", &json!({"invalid_key": "data"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "workflow"]));
    assert_eq!(backend.outbound_calls(), 0);
}

#[tokio::test]
async fn test_execute_non_json_body_is_422() {
    let backend = MockBackend::new(Reply::Json(json!({})));
    let server = gateway(backend.clone()).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/workflow/execute"))
        .body("workflow=1")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(backend.outbound_calls(), 0);
}

#[tokio::test]
async fn test_execute_is_not_deduplicated() {
    let backend = MockBackend::new(Reply::Json(json!({"prompt_id": "p"})));
    let server = gateway(backend.clone()).await;

    for _ in 0..2 {
        let (status, _) =
            post_json(&server, "/api/workflow/execute", &sample_submission()).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(backend.submit_count(), 2);
}

#[tokio::test]
async fn test_execute_timeout() {
    let server = gateway(MockBackend::new(Reply::Timeout)).await;

    let (status, body) = post_json(&server, "/api/workflow/execute", &sample_submission()).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, json!({"detail": "ComfyUI service timeout"}));
}

#[tokio::test]
async fn test_execute_backend_error() {
    let server = gateway(MockBackend::new(Reply::Status(400, "bad prompt"))).await;

    let (status, body) = post_json(&server, "/api/workflow/execute", &sample_submission()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"detail": "ComfyUI service error: HTTP 400: bad prompt"})
    );
}

// =============================================================================
// Status / Interrupt / Queue
// =============================================================================

#[tokio::test]
async fn test_status_pass_through() {
    let backend = MockBackend::new(Reply::Json(json!({"status": "completed"})));
    let server = gateway(backend.clone()).await;

    let (status, body) = get_json(&server, "/api/workflow/status/abc123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "completed"}));
    assert_eq!(*backend.history_ids.lock().unwrap(), vec!["abc123".to_string()]);
}

#[tokio::test]
async fn test_status_timeout() {
    let server = gateway(MockBackend::new(Reply::Timeout)).await;

    let (status, body) = get_json(&server, "/api/workflow/status/abc123").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, json!({"detail": "Status check timeout"}));
}

#[tokio::test]
async fn test_interrupt_returns_fixed_message() {
    let backend = MockBackend::new(Reply::Json(json!({"ignored": true})));
    let server = gateway(backend.clone()).await;

    let (status, body) = post_empty(&server, "/api/workflow/interrupt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Workflow interrupted successfully"}));
    assert_eq!(backend.interrupts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_queue_pass_through() {
    let server = gateway(MockBackend::new(Reply::Json(json!({"queue_size": 0})))).await;

    let (status, body) = get_json(&server, "/api/workflow/queue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"queue_size": 0}));
}

#[tokio::test]
async fn test_forwarding_timeouts_are_504() {
    let server = gateway(MockBackend::new(Reply::Timeout)).await;

    let (status, body) = post_empty(&server, "/api/workflow/interrupt").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["detail"].as_str().unwrap().contains("timeout"));

    let (status, body) = get_json(&server, "/api/workflow/queue").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["detail"].as_str().unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_forwarding_transport_errors_are_500() {
    let server = gateway(MockBackend::new(Reply::Unavailable("connection refused"))).await;

    for (status, body) in [
        get_json(&server, "/api/workflow/status/abc123").await,
        post_empty(&server, "/api/workflow/interrupt").await,
        get_json(&server, "/api/workflow/queue").await,
    ] {
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"detail": "ComfyUI service error: connection refused"})
        );
    }
}

// =============================================================================
// Full Stack (gateway -> ComfyClient -> fake ComfyUI)
// =============================================================================

fn slow_comfyui() -> Router {
    let respond = || async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Json(json!({}))
    };
    Router::new()
        .route("/queue", get(respond))
        .route("/history/{prompt_id}", get(respond))
}

fn fake_comfyui() -> Router {
    Router::new()
        .route("/queue", get(|| async { Json(json!({"queue_running": []})) }))
        .route(
            "/prompt",
            post(|| async { Json(json!({"prompt_id": "abc123"})) }),
        )
}

async fn full_stack(upstream: &TestServer, timeout: Duration) -> TestServer {
    let client = ComfyClient::with_timeout(&upstream.base_url(), timeout).unwrap();
    TestServer::start(create_router(AppState::new(Arc::new(client))))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_full_stack_execute() {
    let upstream = TestServer::start(fake_comfyui()).await.unwrap();
    let server = full_stack(&upstream, Duration::from_secs(5)).await;

    let (status, body) = post_json(&server, "/api/workflow/execute", &sample_submission()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prompt_id": "abc123"}));

    let (status, _) = get_json(&server, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_full_stack_status_timeout() {
    let upstream = TestServer::start(slow_comfyui()).await.unwrap();
    let server = full_stack(&upstream, Duration::from_millis(100)).await;

    let (status, body) = get_json(&server, "/api/workflow/status/abc123").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, json!({"detail": "Status check timeout"}));

    let (status, _) = get_json(&server, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_full_stack_missing_route_is_500() {
    // fake ComfyUI has no /interrupt route, so the backend answers 404
    let upstream = TestServer::start(fake_comfyui()).await.unwrap();
    let server = full_stack(&upstream, Duration::from_secs(5)).await;

    let (status, body) = post_empty(&server, "/api/workflow/interrupt").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("ComfyUI service error: HTTP 404"));
}
