//! OpenAiClient - REST client for the OpenAI Chat Completions API.
//!
//! Sends the whole transcript on every call and classifies failures into
//! [`CompletionError`] so the session can report them and carry on.

use std::time::Duration;

use async_trait::async_trait;
use gptc_core::{Completion, CompletionError, CompletionRequest, CompletionService, UsageMetadata};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Completion service backed by an OpenAI-compatible HTTP endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a client for the public OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| CompletionError::Other(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Points the client at another OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<Completion, CompletionError> {
        debug!(model = request.model, messages = request.messages.len(), "POST chat/completions");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            let err = map_http_error(status, &body_text);
            warn!(status = status.as_u16(), error = %err, "completion request rejected");
            return Err(err);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| CompletionError::Other(format!("Failed to parse OpenAI response: {err}")))?;

        extract_completion(parsed)
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[allow(dead_code)]
    r#type: Option<String>,
    code: Option<String>,
}

fn extract_completion(response: ChatCompletionResponse) -> Result<Completion, CompletionError> {
    let usage = response
        .usage
        .map(|u| UsageMetadata {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    let reply = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            CompletionError::Other("OpenAI API returned no content in the response".into())
        })?;

    Ok(Completion { reply, usage })
}

fn map_transport_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout(err.to_string())
    } else if err.is_connect() || err.is_request() || err.is_body() {
        CompletionError::Connection(err.to_string())
    } else {
        CompletionError::Other(format!("OpenAI API request failed: {err}"))
    }
}

fn map_http_error(status: StatusCode, body: &str) -> CompletionError {
    let (message, code) = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(wrapper) => (wrapper.error.message, wrapper.error.code),
        Err(_) => (body.to_string(), None),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited(message),
        StatusCode::PAYLOAD_TOO_LARGE => CompletionError::TooLong(message),
        StatusCode::BAD_REQUEST if is_context_overflow(code.as_deref(), &message) => {
            CompletionError::TooLong(message)
        }
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            CompletionError::InvalidRequest(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CompletionError::Timeout(message),
        _ => CompletionError::Service {
            status: status.as_u16(),
            message,
        },
    }
}

fn is_context_overflow(code: Option<&str>, message: &str) -> bool {
    code == Some("context_length_exceeded") || message.contains("maximum context length")
}
