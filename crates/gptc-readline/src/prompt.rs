use gptc_core::TruncationPrompt;
use rustyline::Editor;
use rustyline::history::FileHistory;
use tracing::warn;

use crate::helper::ReplHelper;

/// Asks the operator through the line editor.
pub(crate) struct EditorPrompt<'a> {
    pub(crate) editor: &'a mut Editor<ReplHelper, FileHistory>,
}

impl TruncationPrompt for EditorPrompt<'_> {
    fn confirm_truncation(&mut self, original_len: usize, max_chars: usize) -> bool {
        let question = format!(
            "Warning: length of webpagetext string = {original_len} which will rapidly use up \
             your tokens; also must be truncated to first {max_chars} chars.  Continue?  (yN): "
        );
        match self.editor.readline(&question) {
            Ok(answer) => is_affirmative(&answer),
            Err(err) => {
                warn!(error = %err, "no answer to truncation prompt; declining");
                false
            }
        }
    }
}

/// Only `y` or `yes` (any case) accept.
pub(crate) fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
