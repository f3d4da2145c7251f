//! Boundary to the remote completion service.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::SessionConfig;
use crate::error::CompletionError;
use crate::session::{Transcript, Turn, UsageMetadata};

/// One completion request: the whole transcript plus sampling parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
    pub temperature: f32,
    pub top_p: f32,
}

impl<'a> CompletionRequest<'a> {
    /// Builds a request from the session's config snapshot.
    pub fn new(config: &'a SessionConfig, transcript: &'a Transcript) -> Self {
        Self {
            model: &config.model,
            messages: transcript.turns(),
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

/// Generated reply text and its token counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub reply: String,
    pub usage: UsageMetadata,
}

/// A text-completion service reachable over the network.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<Completion, CompletionError>;
}
