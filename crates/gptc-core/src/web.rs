//! Stateless chat turns for the web form.
//!
//! The browser owns the history. Each request rebuilds the transcript from the
//! `[user, assistant]` pairs it sends, runs one turn and hands back only the
//! reply text.

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::{CompletionError, TurnAbort};
use crate::link::AutoConfirm;
use crate::session::{Services, Session, Transcript, Turn, TurnOutcome};

/// Why a web turn produced no reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WebError {
    /// The message was blank and no page text was injected.
    #[error("Nothing to send.")]
    EmptyMessage,

    #[error(transparent)]
    Aborted(#[from] TurnAbort),

    #[error("{}", .0.user_message())]
    Completion(#[from] CompletionError),
}

impl WebError {
    /// Whether the caller sent something unusable (as opposed to a downstream failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyMessage | Self::Aborted(TurnAbort::UserAborted))
    }
}

/// Rebuilds the transcript a web turn is submitted with, `input` excluded.
pub fn reconstruct_transcript(config: &SessionConfig, history: &[(String, String)]) -> Transcript {
    let mut transcript = Transcript::with_system(config.system_prompt.clone());
    for (user, assistant) in history {
        transcript.push(Turn::user(user.clone()));
        transcript.push(Turn::assistant(assistant.clone()));
    }
    transcript
}

/// Runs one turn for `input` on top of `history` and returns the reply text.
///
/// Oversized pages are handled by `accept_truncation` since nobody can be
/// asked. Exit tokens are sent as ordinary text.
pub async fn respond(
    config: &SessionConfig,
    history: &[(String, String)],
    input: &str,
    services: Services<'_>,
    accept_truncation: bool,
) -> Result<String, WebError> {
    let transcript = reconstruct_transcript(config, history);
    debug!(prior_turns = transcript.len(), "reconstructed web transcript");

    let mut session = Session::with_transcript(config.clone(), transcript);
    let mut prompt = AutoConfirm(accept_truncation);
    let report = session.run_turn(input, services, &mut prompt).await;

    if let Some(notice) = &report.link_notice {
        warn!(%notice, "web turn ignored link tag");
    }

    match report.outcome {
        TurnOutcome::Reply(reply) => Ok(reply.text),
        TurnOutcome::Failed(err) => Err(err.into()),
        TurnOutcome::Aborted(abort) => Err(abort.into()),
        TurnOutcome::Empty | TurnOutcome::Exit => Err(WebError::EmptyMessage),
    }
}
