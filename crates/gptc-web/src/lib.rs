//! Local web chat front-end.
//!
//! The browser keeps the conversation; every `POST /api/chat` carries the
//! full `[user, assistant]` history and gets back one reply.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use gptc_core::web::{WebError, respond};
use gptc_core::{CompletionError, CompletionService, PageFetcher, Services, SessionConfig, TurnAbort};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

const INDEX_HTML: &str = include_str!("index.html");

/// Shared, read-only state. No transcript lives here.
#[derive(Clone)]
pub struct WebState {
    pub config: Arc<SessionConfig>,
    pub completion: Arc<dyn CompletionService>,
    pub fetcher: Arc<dyn PageFetcher>,
    /// Policy for oversized pages, since no operator can be asked.
    pub accept_truncation: bool,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<(String, String)>,
}

/// Build the axum router with the page and API routes.
pub fn build_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/api/health", get(handle_health))
        .route("/api/chat", post(handle_chat))
        .with_state(state)
}

/// Binds `host:port` and serves until the process is stopped.
pub async fn serve(host: &str, port: u16, state: WebState) -> Result<()> {
    let listener = TcpListener::bind(format!("{host}:{port}"))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, model = %state.config.model, "web chat listening");
    println!("gptc web chat running at http://{addr}/");

    axum::serve(listener, build_router(state))
        .await
        .context("Web server failed")
}

// ── Response helpers ─────────────────────────────────────────────

type ApiResponse = (StatusCode, Json<serde_json::Value>);

fn ok_json(value: serde_json::Value) -> ApiResponse {
    (StatusCode::OK, Json(value))
}

fn err_json(status: StatusCode, message: &str) -> ApiResponse {
    (status, Json(serde_json::json!({ "error": message })))
}

fn web_err_to_response(err: &WebError) -> ApiResponse {
    let status = match err {
        _ if err.is_client_error() => StatusCode::BAD_REQUEST,
        WebError::Aborted(TurnAbort::FetchFailed(_)) => StatusCode::BAD_GATEWAY,
        WebError::Completion(e) if e.is_rate_limited() => StatusCode::TOO_MANY_REQUESTS,
        WebError::Completion(CompletionError::TooLong(_)) => StatusCode::PAYLOAD_TOO_LARGE,
        WebError::Completion(CompletionError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        WebError::Completion(e) if e.is_transport() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    };
    err_json(status, &err.to_string())
}

// ── Handlers ─────────────────────────────────────────────────────

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_health(State(state): State<WebState>) -> impl IntoResponse {
    ok_json(serde_json::json!({
        "status": "ok",
        "model": state.config.model,
    }))
}

async fn handle_chat(
    State(state): State<WebState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let services = Services {
        completion: state.completion.as_ref(),
        fetcher: state.fetcher.as_ref(),
    };

    match respond(
        &state.config,
        &request.history,
        &request.message,
        services,
        state.accept_truncation,
    )
    .await
    {
        Ok(reply) => ok_json(serde_json::json!({ "reply": reply })),
        Err(err) => {
            warn!(error = %err, "web chat turn failed");
            web_err_to_response(&err)
        }
    }
}
