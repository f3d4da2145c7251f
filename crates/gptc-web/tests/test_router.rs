use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gptc_core::{
    Completion, CompletionError, CompletionRequest, CompletionService, FetchError, PageFetcher,
    SessionConfig, UsageMetadata,
};
use gptc_web::{WebState, build_router};
use reqwest::{StatusCode, Url};

/// Echoes the last user turn and records what it was sent.
#[derive(Default)]
struct EchoService {
    seen: Mutex<Vec<Vec<(String, String)>>>,
    fail_with: Option<CompletionError>,
}

#[async_trait]
impl CompletionService for EchoService {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<Completion, CompletionError> {
        let turns: Vec<(String, String)> = request
            .messages
            .iter()
            .map(|t| (format!("{:?}", t.role()).to_lowercase(), t.content().to_string()))
            .collect();
        let last = turns.last().map(|(_, c)| c.clone()).unwrap_or_default();
        self.seen.lock().unwrap().push(turns);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(Completion {
            reply: format!("echo: {last}"),
            usage: UsageMetadata {
                prompt_tokens: 10,
                completion_tokens: 2,
            },
        })
    }
}

struct NoPages;

#[async_trait]
impl PageFetcher for NoPages {
    async fn fetch_text(&self, _url: &Url) -> Result<String, FetchError> {
        Err(FetchError::Http { status: 404 })
    }
}

async fn spawn_app(service: Arc<EchoService>) -> String {
    let state = WebState {
        config: Arc::new(SessionConfig {
            system_prompt: "sys".into(),
            ..Default::default()
        }),
        completion: service,
        fetcher: Arc::new(NoPages),
        accept_truncation: true,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_chat_reconstructs_history_and_returns_reply_only() {
    let service = Arc::new(EchoService::default());
    let base = spawn_app(service.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/chat"))
        .json(&serde_json::json!({
            "message": "how are you?",
            "history": [["hi", "hello!"]]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "reply": "echo: how are you?" }));

    let seen = service.seen.lock().unwrap().clone();
    let expected: Vec<(String, String)> = [
        ("system", "sys"),
        ("user", "hi"),
        ("assistant", "hello!"),
        ("user", "how are you?"),
    ]
    .iter()
    .map(|(r, c)| (r.to_string(), c.to_string()))
    .collect();
    assert_eq!(seen, vec![expected]);
}

#[tokio::test]
async fn test_requests_do_not_share_a_transcript() {
    let service = Arc::new(EchoService::default());
    let base = spawn_app(service.clone()).await;
    let client = reqwest::Client::new();

    for message in ["first", "second"] {
        let response = client
            .post(format!("{base}/api/chat"))
            .json(&serde_json::json!({ "message": message, "history": [] }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let seen = service.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].len(), 2);
    assert_eq!(seen[1].len(), 2);
    assert_eq!(seen[1][1].1, "second");
}

#[tokio::test]
async fn test_failures_return_error_json() {
    let service = Arc::new(EchoService {
        fail_with: Some(CompletionError::RateLimited("busy".into())),
        ..Default::default()
    });
    let base = spawn_app(service).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/chat"))
        .json(&serde_json::json!({ "message": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Sorry, hit a too-many-users limit: busy.");

    let response = client
        .post(format!("{base}/api/chat"))
        .json(&serde_json::json!({ "message": "read <<http://missing.example>>" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = client
        .post(format!("{base}/api/chat"))
        .json(&serde_json::json!({ "message": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_index_and_health() {
    let base = spawn_app(Arc::new(EchoService::default())).await;

    let page = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("/api/chat"));

    let health: serde_json::Value = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["model"], "gpt-4");
}
