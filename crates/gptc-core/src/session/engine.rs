//! Turn orchestration.
//!
//! One call to [`Session::handle_line`] walks a logical input line through
//! `TagScan → [LinkFetch] → Compose → Submit` and reports what happened.
//! Rendering is left to the caller.

use tracing::{debug, info, warn};

use crate::completion::{CompletionRequest, CompletionService};
use crate::config::SessionConfig;
use crate::error::{CompletionError, TurnAbort};
use crate::link::{LinkOutcome, PageFetcher, TruncationPrompt, expand_link};
use crate::session::{Transcript, Turn, UsageMetadata};
use crate::tag;

/// A successful reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub usage: UsageMetadata,
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// An exit token was entered.
    Exit,
    /// Nothing to send; the transcript is untouched.
    Empty,
    /// The turn was dropped before submission; the transcript is untouched.
    Aborted(TurnAbort),
    /// The service answered; an assistant turn was appended.
    Reply(Reply),
    /// The service failed; the user turns stay in the transcript.
    Failed(CompletionError),
}

/// Outcome of a turn plus any note about an ignored link tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub link_notice: Option<String>,
}

impl From<TurnOutcome> for TurnReport {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            outcome,
            link_notice: None,
        }
    }
}

/// Collaborators a turn needs.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub completion: &'a dyn CompletionService,
    pub fetcher: &'a dyn PageFetcher,
}

/// An interactive conversation: owns its config snapshot and transcript.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    transcript: Transcript,
}

impl Session {
    /// Starts a session with the system turn seeded from `config`.
    pub fn new(config: SessionConfig) -> Self {
        let transcript = Transcript::with_system(config.system_prompt.clone());
        Self { config, transcript }
    }

    /// Starts a session from an existing transcript (used by the web adapter).
    pub fn with_transcript(config: SessionConfig, transcript: Transcript) -> Self {
        Self { config, transcript }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Handles one logical input line, exit tokens included.
    pub async fn handle_line<P>(
        &mut self,
        line: &str,
        services: Services<'_>,
        prompt: &mut P,
    ) -> TurnReport
    where
        P: TruncationPrompt + ?Sized,
    {
        if tag::is_exit_token(line) {
            return TurnOutcome::Exit.into();
        }
        self.run_turn(line, services, prompt).await
    }

    /// Runs steps tag scan through submit for one message.
    pub async fn run_turn<P>(
        &mut self,
        input: &str,
        services: Services<'_>,
        prompt: &mut P,
    ) -> TurnReport
    where
        P: TruncationPrompt + ?Sized,
    {
        let (message, address) = if self.config.allow_injections {
            let scan = tag::scan(input);
            (scan.message, scan.address)
        } else {
            (input.to_string(), None)
        };

        let mut link_notice = None;
        let mut page_text = None;
        if let Some(address) = address {
            match expand_link(
                &address,
                self.config.max_injected_chars,
                services.fetcher,
                prompt,
            )
            .await
            {
                LinkOutcome::Injected(text) => page_text = Some(text),
                LinkOutcome::NoAddress(reason) => link_notice = Some(reason),
                LinkOutcome::Aborted(abort) => {
                    return TurnReport {
                        outcome: TurnOutcome::Aborted(abort),
                        link_notice,
                    };
                }
            }
        }

        let outcome = if self.compose(message, page_text) == 0 {
            TurnOutcome::Empty
        } else {
            match self.submit(services.completion).await {
                Ok(reply) => TurnOutcome::Reply(reply),
                Err(err) => TurnOutcome::Failed(err),
            }
        };

        TurnReport {
            outcome,
            link_notice,
        }
    }

    /// Appends the user turns for this input; returns how many were added.
    fn compose(&mut self, message: String, page_text: Option<String>) -> usize {
        let mut appended = 0;
        if !message.trim().is_empty() {
            self.transcript.push(Turn::user(message));
            appended += 1;
        }
        if let Some(text) = page_text {
            self.transcript.push(Turn::user(text));
            appended += 1;
        }
        appended
    }

    /// Sends the whole transcript and records the reply.
    pub async fn submit(
        &mut self,
        service: &dyn CompletionService,
    ) -> Result<Reply, CompletionError> {
        debug!(
            model = %self.config.model,
            temperature = self.config.temperature,
            top_p = self.config.top_p,
            transcript = ?self.transcript,
            "submitting transcript"
        );

        let request = CompletionRequest::new(&self.config, &self.transcript);
        match service.complete(&request).await {
            Ok(completion) => {
                self.transcript
                    .push(Turn::assistant(completion.reply.clone()));
                info!(
                    prompt_tokens = completion.usage.prompt_tokens,
                    completion_tokens = completion.usage.completion_tokens,
                    turns = self.transcript.len(),
                    "completion received"
                );
                debug!(transcript = ?self.transcript, "transcript after reply");
                Ok(Reply {
                    text: completion.reply,
                    usage: completion.usage,
                })
            }
            Err(err) => {
                warn!(error = %err, "completion failed; keeping unanswered user turns");
                Err(err)
            }
        }
    }
}
