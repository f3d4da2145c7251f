//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Url;

use crate::completion::{Completion, CompletionRequest, CompletionService};
use crate::error::{CompletionError, FetchError};
use crate::link::{PageFetcher, TruncationPrompt};
use crate::session::{Turn, UsageMetadata};

/// Completion service that replays scripted results and records every request.
#[derive(Default)]
pub struct ScriptedService {
    results: Mutex<VecDeque<Result<Completion, CompletionError>>>,
    requests: Mutex<Vec<Vec<Turn>>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str, prompt_tokens: u64, completion_tokens: u64) -> Self {
        self.results.lock().unwrap().push_back(Ok(Completion {
            reply: text.to_string(),
            usage: UsageMetadata {
                prompt_tokens,
                completion_tokens,
            },
        }));
        self
    }

    pub fn fail(self, err: CompletionError) -> Self {
        self.results.lock().unwrap().push_back(Err(err));
        self
    }

    /// Transcripts received so far, one entry per call.
    pub fn requests(&self) -> Vec<Vec<Turn>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedService {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<Completion, CompletionError> {
        self.requests.lock().unwrap().push(request.messages.to_vec());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Other("no scripted result".into())))
    }
}

/// Page fetcher returning a fixed result.
pub struct StaticFetcher {
    result: Result<String, FetchError>,
    calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn page(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            result: Err(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.result.clone()
    }
}

/// Truncation prompt that always answers `answer` and counts questions.
pub struct CountingPrompt {
    pub answer: bool,
    pub asked: usize,
}

impl CountingPrompt {
    pub fn answering(answer: bool) -> Self {
        Self { answer, asked: 0 }
    }
}

impl TruncationPrompt for CountingPrompt {
    fn confirm_truncation(&mut self, _original_len: usize, _max_chars: usize) -> bool {
        self.asked += 1;
        self.answer
    }
}
