use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use gptc_core::tag::{END_MARKER, MULTI_MARKER};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Readline helper: completes and hints the `<<multi>>`/`<<end>>` markers,
/// highlights `<<...>>` tags and colors the prompt.
#[derive(Clone)]
pub(crate) struct ReplHelper {
    markers: Vec<String>,
}

impl ReplHelper {
    pub(crate) fn new() -> Self {
        Self {
            markers: vec![MULTI_MARKER.to_string(), END_MARKER.to_string()],
        }
    }

    /// Start of the `<<` word the cursor is in, if any.
    fn marker_start(line: &str) -> Option<usize> {
        let start = line.rfind("<<")?;
        (!line[start..].contains(char::is_whitespace)).then_some(start)
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        let Some(start) = Self::marker_start(line) else {
            return Ok((0, vec![]));
        };
        let word = &line[start..];
        let candidates: Vec<Pair> = self
            .markers
            .iter()
            .filter(|marker| marker.starts_with(word))
            .map(|marker| Pair {
                display: marker.clone(),
                replacement: marker.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.contains("<<") {
            return Borrowed(line);
        }

        let mut out = String::with_capacity(line.len() + 16);
        let mut rest = line;
        while let Some(open) = rest.find("<<") {
            let Some(close) = rest[open..].find(">>") else {
                break;
            };
            let end = open + close + 2;
            out.push_str(&rest[..open]);
            out.push_str(&rest[open..end].bright_cyan().to_string());
            rest = &rest[end..];
        }
        out.push_str(rest);
        Owned(out)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Owned(prompt.bright_green().bold().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        let start = Self::marker_start(line)?;
        let word = &line[start..];

        self.markers
            .iter()
            .find(|marker| marker.starts_with(word) && marker.len() > word.len())
            .map(|marker| marker[word.len()..].to_string())
    }
}

impl Validator for ReplHelper {}
