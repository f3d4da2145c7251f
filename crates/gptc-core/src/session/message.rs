//! Conversation message types.
//!
//! This module contains the role-tagged [`Turn`] and the ordered
//! [`Transcript`] a session sends to the completion service.

use serde::{Deserialize, Serialize};

/// Represents the role of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions seeded at session start.
    System,
    /// Text entered by the operator (or injected page text).
    User,
    /// Reply from the completion service.
    Assistant,
}

/// A single role-tagged utterance. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Token counts reported for one completion call. Never stored in the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Ordered conversation history.
///
/// The system turn, when present, is always first; after that the transcript
/// only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates a transcript seeded with a system turn.
    pub fn with_system(prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(prompt)],
        }
    }

    /// Appends a user or assistant turn.
    ///
    /// System turns are only accepted on an empty transcript.
    pub fn push(&mut self, turn: Turn) {
        debug_assert!(
            turn.role() != Role::System || self.turns.is_empty(),
            "system turn must come first"
        );
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
