//! The read-evaluate-render loop.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gptc_core::tag::{self, LineInput, MultilineBuffer};
use gptc_core::{Services, Session, TurnOutcome};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use tracing::{debug, info, warn};

use crate::display;
use crate::helper::ReplHelper;
use crate::prompt::EditorPrompt;
use crate::theme::CodeTheme;

/// Terminal-only settings.
#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub history_file: PathBuf,
    pub theme: CodeTheme,
}

/// What the loop does with one raw input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    /// Leave the loop; any pending multi-line input is dropped.
    Exit,
    /// Blank line outside multi-line input.
    Skip,
    /// Inside `<<multi>>` input; keep reading.
    Pending,
    /// A full logical line ready for the session.
    Submit(String),
}

/// Decides what to do with `line`, feeding it to `buffer` when needed.
pub fn classify_line(buffer: &mut MultilineBuffer, line: &str) -> LineAction {
    if tag::is_exit_token(line.trim()) {
        buffer.reset();
        return LineAction::Exit;
    }
    if !buffer.is_accumulating() && line.trim().is_empty() {
        return LineAction::Skip;
    }
    match buffer.push(line) {
        LineInput::Pending => LineAction::Pending,
        LineInput::Complete(text) => LineAction::Submit(text),
    }
}

/// Runs the interactive session until an exit token, Ctrl-C or Ctrl-D.
pub async fn run(mut session: Session, services: Services<'_>, options: ReplOptions) -> Result<()> {
    let mut editor: Editor<ReplHelper, FileHistory> =
        Editor::new().context("Failed to initialize line editor")?;
    editor.set_helper(Some(ReplHelper::new()));
    if let Err(err) = editor.load_history(&options.history_file) {
        debug!(path = %options.history_file.display(), error = %err, "no history loaded");
    }

    info!(model = %session.config().model, "interactive session started");
    display::print_intro(session.config());

    let mut buffer = MultilineBuffer::new();
    loop {
        let prompt = if buffer.is_accumulating() {
            display::CONTINUE_PROMPT
        } else {
            display::ME_PROMPT
        };

        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        let text = match classify_line(&mut buffer, &line) {
            LineAction::Exit => break,
            LineAction::Skip => continue,
            LineAction::Pending => {
                remember(&mut editor, &line, &options.history_file);
                continue;
            }
            LineAction::Submit(text) => {
                remember(&mut editor, &line, &options.history_file);
                text
            }
        };

        let report = {
            let mut prompt = EditorPrompt {
                editor: &mut editor,
            };
            session.handle_line(&text, services, &mut prompt).await
        };

        if let Some(notice) = &report.link_notice {
            display::print_link_notice(notice);
        }
        match report.outcome {
            TurnOutcome::Exit => break,
            TurnOutcome::Empty => {}
            TurnOutcome::Aborted(abort) => display::print_abort(&abort),
            TurnOutcome::Failed(err) => display::print_failure(&err),
            TurnOutcome::Reply(reply) => display::print_reply(
                &reply.text,
                &reply.usage,
                session.config().show_usage,
                options.theme,
            ),
        }
    }

    display::print_goodbye();
    info!(turns = session.transcript().len(), "interactive session ended");
    Ok(())
}

fn remember(editor: &mut Editor<ReplHelper, FileHistory>, line: &str, path: &Path) {
    if let Err(err) = editor.add_history_entry(line) {
        warn!(error = %err, "failed to record history entry");
        return;
    }
    if let Err(err) = editor.append_history(path) {
        warn!(path = %path.display(), error = %err, "failed to append history file");
    }
}
