//! Text shown around each turn.

use colored::Colorize;
use gptc_core::{CompletionError, SessionConfig, TurnAbort, UsageMetadata};

use crate::markdown::render_markdown;
use crate::theme::CodeTheme;

pub(crate) const ME_PROMPT: &str = "Me: ";
pub(crate) const CONTINUE_PROMPT: &str = "... ";
pub(crate) const GPT_LABEL: &str = "GPT:";

pub(crate) fn intro(config: &SessionConfig) -> String {
    format!(
        "Params: {}\nYou can enter page contents of a URL by putting the URL in double \
         chevrons like this: <<URL>>\nFor multi-line input start with <<multi>> and finish \
         with <<end>>. Type exit, quit or q to leave.\n",
        config.describe()
    )
}

pub(crate) fn prompt_tokens_line(usage: &UsageMetadata) -> String {
    format!(
        "[{} prompt-tokens; includes resubmission of all history this session plus page \
         contents of any urls given...]",
        usage.prompt_tokens
    )
}

pub(crate) fn completion_tokens_line(usage: &UsageMetadata) -> String {
    format!(
        "[{} completion-tokens just for this response...]",
        usage.completion_tokens
    )
}

pub(crate) fn print_intro(config: &SessionConfig) {
    println!("{}", intro(config).bright_black());
}

pub(crate) fn print_reply(text: &str, usage: &UsageMetadata, show_usage: bool, theme: CodeTheme) {
    if show_usage {
        println!("{}", prompt_tokens_line(usage).color(theme.chrome()));
        println!();
    }
    println!("{}", GPT_LABEL.bright_cyan().bold());
    println!("{}", render_markdown(text, theme));
    if show_usage {
        println!("{}", completion_tokens_line(usage).color(theme.chrome()));
    }
    println!();
}

pub(crate) fn print_link_notice(notice: &str) {
    println!("{}", format!("Ignoring link tag: {notice}").yellow());
}

pub(crate) fn print_abort(abort: &TurnAbort) {
    match abort {
        TurnAbort::UserAborted => println!("{}", abort.to_string().yellow()),
        TurnAbort::FetchFailed(_) => eprintln!("{}", abort.to_string().red()),
    }
}

pub(crate) fn print_failure(err: &CompletionError) {
    eprintln!("{}", err.user_message().red());
}

pub(crate) fn print_goodbye() {
    println!("\n\n{}", "Ok, goodbye...".bright_green());
}
