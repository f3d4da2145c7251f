//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TOP_P: f32 = 0.1;
pub const DEFAULT_MAX_INJECTED_CHARS: usize = 20_000;

pub const DEFAULT_SYSTEM_PROMPT: &str = "The following is a conversation with an AI assistant. \
The assistant is helpful, creative, friendly. Its answers are polite but brief, only rarely \
exceeding a single paragraph when really necessary to explain a point. The assistant labels \
all markdown code snippets with the code language. Mathematical answers and expressions \
written by the assistant are always formatted in unicode characters rather than latex, using \
full mathematical notation rather than programming notation. The assistant only very \
occasionally uses emojis to show enthusiasm.";

/// Parameters fixed for the lifetime of a session.
///
/// A [`crate::session::Session`] takes ownership of its config; every request
/// it sends is built from this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Completion model identifier (e.g. `gpt-4`).
    pub model: String,
    /// Sampling temperature, 0.0 to 2.0.
    pub temperature: f32,
    /// Nucleus sampling mass, 0.0 to 1.0.
    pub top_p: f32,
    /// Character cap for injected page text.
    pub max_injected_chars: usize,
    /// First turn of every transcript.
    pub system_prompt: String,
    /// Whether `<<URL>>` tags are expanded.
    pub allow_injections: bool,
    /// Whether token counts are shown after each reply.
    pub show_usage: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_injected_chars: DEFAULT_MAX_INJECTED_CHARS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            allow_injections: true,
            show_usage: true,
        }
    }
}

impl SessionConfig {
    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "temperature",
                format!("{} is outside 0.0..=2.0", self.temperature),
            ));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ConfigError::invalid(
                "top_p",
                format!("{} is outside 0.0..=1.0", self.top_p),
            ));
        }
        if self.max_injected_chars == 0 {
            return Err(ConfigError::invalid(
                "max_injected_chars",
                "must be a positive number of characters",
            ));
        }
        Ok(())
    }

    /// Model parameters in the form shown by the interactive intro banner.
    pub fn describe(&self) -> String {
        format!(
            "model: {}, temperature: {}, top_p: {}, max_chars: {}, allow_injections: {}",
            self.model, self.temperature, self.top_p, self.max_injected_chars, self.allow_injections
        )
    }
}
