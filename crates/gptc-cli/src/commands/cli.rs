use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use gptc_core::{Services, Session};
use gptc_infrastructure::GptcPaths;
use gptc_readline::{ReplOptions, ThemeChoice};

use super::logging;
use super::options::{Backends, SessionArgs, load_settings, session_config};

#[derive(Debug, Args)]
pub struct CliArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Input history file (default ~/.gpt_history)
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// Code block colors: auto, light or dark
    #[arg(long)]
    pub code_theme: Option<ThemeChoice>,
}

pub async fn run(args: CliArgs) -> Result<()> {
    let _guard = logging::init(args.session.debug, false)?;

    let settings = load_settings()?;
    let config = session_config(&args.session, &settings)?;
    let backends = Backends::from_env()?;

    let history_file = match args.history_file.or(settings.cli.history_file) {
        Some(path) => path,
        None => GptcPaths::history_file()?,
    };
    let theme = match (args.code_theme, settings.cli.code_theme) {
        (Some(choice), _) => choice,
        (None, Some(name)) => name.parse::<ThemeChoice>().map_err(anyhow::Error::msg)?,
        (None, None) => ThemeChoice::Auto,
    };

    let services = Services {
        completion: backends.completion(),
        fetcher: backends.fetcher(),
    };
    let options = ReplOptions {
        history_file,
        theme: theme.resolve(),
    };

    gptc_readline::run(Session::new(config), services, options).await
}
