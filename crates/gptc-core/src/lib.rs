//! Domain layer for gptc.
//!
//! Holds the conversation model, the tag protocol, link expansion and the
//! session engine. Network and terminal collaborators live in other crates
//! and plug in through [`CompletionService`], [`PageFetcher`] and
//! [`TruncationPrompt`].

pub mod completion;
pub mod config;
pub mod error;
pub mod link;
pub mod session;
pub mod tag;
pub mod web;

#[cfg(test)]
mod testing;

pub use completion::{Completion, CompletionRequest, CompletionService};
pub use config::SessionConfig;
pub use error::{CompletionError, ConfigError, FetchError, TurnAbort};
pub use link::{AutoConfirm, PageFetcher, TruncationPrompt};
pub use session::{Reply, Role, Services, Session, Transcript, Turn, TurnOutcome, UsageMetadata};
