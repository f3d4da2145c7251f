use gptc_core::{CompletionError, CompletionRequest, CompletionService, SessionConfig, Transcript, Turn};
use gptc_interaction::OpenAiClient;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transcript() -> Transcript {
    let mut transcript = Transcript::with_system("sys");
    transcript.push(Turn::user("hi"));
    transcript
}

fn client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new("test-key")
        .unwrap()
        .with_base_url(format!("{}/v1", server.uri()))
}

#[tokio::test]
async fn test_complete_sends_transcript_and_reads_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4",
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "hi"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "hello!"}}],
            "usage": {"prompt_tokens": 15, "completion_tokens": 2, "total_tokens": 17}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SessionConfig::default();
    let transcript = transcript();
    let completion = client(&server)
        .complete(&CompletionRequest::new(&config, &transcript))
        .await
        .unwrap();

    assert_eq!(completion.reply, "hello!");
    assert_eq!(completion.usage.prompt_tokens, 15);
    assert_eq!(completion.usage.completion_tokens, 2);
}

#[tokio::test]
async fn test_rate_limit_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded"}
        })))
        .mount(&server)
        .await;

    let config = SessionConfig::default();
    let transcript = transcript();
    let err = client(&server)
        .complete(&CompletionRequest::new(&config, &transcript))
        .await
        .unwrap_err();

    assert_eq!(err, CompletionError::RateLimited("Rate limit reached".into()));
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_bad_key_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}
        })))
        .mount(&server)
        .await;

    let config = SessionConfig::default();
    let transcript = transcript();
    let err = client(&server)
        .complete(&CompletionRequest::new(&config, &transcript))
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Authentication(_)));
    assert_eq!(err.user_message(), "OpenAI API Error: Incorrect API key provided");
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let config = SessionConfig::default();
    let transcript = transcript();
    let err = client(&server)
        .complete(&CompletionRequest::new(&config, &transcript))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CompletionError::Service {
            status: 503,
            message: "overloaded".into()
        }
    );
}

/// A local port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let base = format!("http://127.0.0.1:{}/v1", closed_port());

    let config = SessionConfig::default();
    let transcript = transcript();
    let err = OpenAiClient::new("k")
        .unwrap()
        .with_base_url(base)
        .complete(&CompletionRequest::new(&config, &transcript))
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Connection(_)), "unexpected error: {err:?}");
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_connection_closed_mid_request_is_connection_error() {
    use tokio::io::AsyncReadExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
    });

    let config = SessionConfig::default();
    let transcript = transcript();
    let err = OpenAiClient::new("k")
        .unwrap()
        .with_base_url(format!("http://{addr}/v1"))
        .complete(&CompletionRequest::new(&config, &transcript))
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Connection(_)), "unexpected error: {err:?}");
}
