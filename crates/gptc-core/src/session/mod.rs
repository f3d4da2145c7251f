//! Conversation state and the per-turn state machine.

mod engine;
mod message;

pub use engine::{Reply, Services, Session, TurnOutcome, TurnReport};
pub use message::{Role, Transcript, Turn, UsageMetadata};
