use super::*;
use crate::error::LogSearchError;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> BackendClient {
    BackendClient::new(base_url, Duration::from_secs(5)).unwrap()
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    let prompt = body["prompt"].as_str().unwrap_or_default();
    Json(json!({"result": format!("echo: {}", prompt), "status": "success"}))
}

#[tokio::test]
async fn test_query_posts_prompt_and_returns_body() {
    let base = spawn_backend(Router::new().route("/get_prompt", post(echo))).await;

    let body = client(&base).query("show me errors").await.unwrap();

    assert_eq!(body["status"], "success");
    assert_eq!(body["result"], "echo: show me errors");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let base = spawn_backend(Router::new().route("/get_prompt", post(echo))).await;

    let body = client(&format!("{}/", base)).query("hi").await.unwrap();

    assert_eq!(body["result"], "echo: hi");
}

#[tokio::test]
async fn test_query_server_error_is_transport_failure() {
    let app = Router::new().route(
        "/get_prompt",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "agent crashed") }),
    );
    let base = spawn_backend(app).await;

    let err = client(&base).query("hi").await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.to_string(), "Failed to fetch: 500 Internal Server Error");
}

#[tokio::test]
async fn test_query_non_json_body_is_protocol_failure() {
    let app = Router::new().route("/get_prompt", post(|| async { "definitely not json" }));
    let base = spawn_backend(app).await;

    let err = client(&base).query("hi").await.unwrap_err();

    assert!(err.is_protocol());
    assert!(matches!(err, LogSearchError::Protocol(_)));
}

#[tokio::test]
async fn test_query_unreachable_backend() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr)).query("hi").await.unwrap_err();

    assert!(matches!(err, LogSearchError::Http(_)));
    assert!(err.is_transport());
    assert!(err.hint().is_some());
}

#[tokio::test]
async fn test_reset_success_and_failure() {
    let ok = Router::new().route(
        "/reset_conversation",
        post(|| async {
            Json(json!({"status": "success", "message": "Conversation history reset"}))
        }),
    );
    let base = spawn_backend(ok).await;
    client(&base).reset().await.unwrap();

    let failing = Router::new().route(
        "/reset_conversation",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let base = spawn_backend(failing).await;
    let err = client(&base).reset().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to reset conversation");
    let status = match err {
        LogSearchError::Api { status, .. } => status,
        other => panic!("expected a status failure, got {:?}", other),
    };
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_and_agent_status() {
    let app = Router::new()
        .route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "agent_status": "running"})) }),
        )
        .route(
            "/agent_status",
            get(|| async {
                Json(json!({
                    "agent_initialized": true,
                    "context_active": true,
                    "status": "ready"
                }))
            }),
        );
    let base = spawn_backend(app).await;
    let client = client(&base);

    let health = client.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.agent_status.as_deref(), Some("running"));

    let status = client.agent_status().await.unwrap();
    assert_eq!(
        status,
        AgentStatus {
            agent_initialized: true,
            context_active: true,
            status: "ready".to_string(),
        }
    );
}

#[tokio::test]
async fn test_status_failure_stays_quiet_at_default_log_level() {
    let logs = Arc::new(Mutex::new(Vec::<u8>::new()));
    let sink = Arc::clone(&logs);
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || LogSink(Arc::clone(&sink)))
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = Router::new().route(
        "/get_prompt",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = spawn_backend(app).await;
    assert!(client(&base).query("hi").await.is_err());

    assert!(logs.lock().unwrap().is_empty());
}

struct LogSink(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
