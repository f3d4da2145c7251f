//! Inline directives in user input.
//!
//! - `<<ADDRESS>>` asks for the page at ADDRESS to be spliced into the turn.
//! - `<<multi>>` ... `<<end>>` collects several input lines into one message.

use std::sync::OnceLock;

use regex::Regex;

/// Inputs that end the session. Matched exactly, before any tag handling.
pub const EXIT_TOKENS: [&str; 3] = ["exit", "quit", "q"];

pub const MULTI_MARKER: &str = "<<multi>>";
pub const END_MARKER: &str = "<<end>>";

fn link_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<<(.*?)>>").expect("valid link tag pattern"))
}

// Each marker also matches one separating space on either side.
fn multi_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i) ?<<multi>> ?").expect("valid multi marker pattern"))
}

fn end_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i) ?<<end>> ?").expect("valid end marker pattern"))
}

/// Returns true if `line` is one of the exit commands.
pub fn is_exit_token(line: &str) -> bool {
    EXIT_TOKENS.contains(&line)
}

/// Result of scanning one message for a link tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagScan {
    /// The message with the first `<<...>>` span removed.
    pub message: String,
    /// Text captured between the markers, if a tag was present.
    pub address: Option<String>,
}

/// Finds the first `<<...>>` span and separates it from the message text.
pub fn scan(input: &str) -> TagScan {
    match link_tag().captures(input) {
        Some(caps) => {
            let span = caps.get(0).expect("group 0 always matches");
            let mut message = String::with_capacity(input.len() - span.len());
            message.push_str(&input[..span.start()]);
            message.push_str(&input[span.end()..]);
            TagScan {
                message,
                address: caps.get(1).map(|m| m.as_str().to_string()),
            }
        }
        None => TagScan {
            message: input.to_string(),
            address: None,
        },
    }
}

/// Outcome of feeding one raw line to a [`MultilineBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineInput {
    /// A full logical line is ready.
    Complete(String),
    /// More lines are needed before `<<end>>`.
    Pending,
}

/// Accumulates `<<multi>>` ... `<<end>>` input into one message.
///
/// Two states: single-line (no buffer) and accumulating (buffer present).
#[derive(Debug, Default)]
pub struct MultilineBuffer {
    lines: Option<Vec<String>>,
}

impl MultilineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_accumulating(&self) -> bool {
        self.lines.is_some()
    }

    /// Drops any partial input and returns to single-line mode.
    pub fn reset(&mut self) {
        self.lines = None;
    }

    pub fn push(&mut self, line: &str) -> LineInput {
        let opens = multi_marker().is_match(line);
        let closes = end_marker().is_match(line);

        let Some(mut lines) = self.lines.take() else {
            if !opens {
                return LineInput::Complete(line.to_string());
            }
            let stripped = strip_markers(line);
            if closes {
                return LineInput::Complete(stripped);
            }
            let mut lines = Vec::new();
            if !stripped.is_empty() {
                lines.push(stripped);
            }
            self.lines = Some(lines);
            return LineInput::Pending;
        };

        if opens || closes {
            let stripped = strip_markers(line);
            if !stripped.is_empty() {
                lines.push(stripped);
            }
        } else {
            lines.push(line.to_string());
        }

        if closes {
            LineInput::Complete(lines.join("\n"))
        } else {
            self.lines = Some(lines);
            LineInput::Pending
        }
    }
}

/// Removes the markers, keeping any indentation of the remaining text.
fn strip_markers(line: &str) -> String {
    let without_multi = multi_marker().replace_all(line, "");
    let stripped = end_marker().replace_all(&without_multi, "");
    if stripped.trim().is_empty() {
        String::new()
    } else {
        stripped.trim_end().to_string()
    }
}
