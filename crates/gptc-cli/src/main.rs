use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::cli::CliArgs;
use commands::webapp::WebappArgs;

#[derive(Parser)]
#[command(name = "gptc", version)]
#[command(about = "gptc - chat with OpenAI models from the terminal or a local web page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal chat
    Cli(CliArgs),
    /// Local web chat page
    Webapp(WebappArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Cli(args) => commands::cli::run(args).await,
        Commands::Webapp(args) => commands::webapp::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cli_subcommand() {
        let cli = Cli::try_parse_from([
            "gptc",
            "cli",
            "--model",
            "gpt-4o",
            "--temperature",
            "0.7",
            "--code-theme",
            "light",
            "--history-file",
            "/tmp/h",
        ])
        .unwrap();
        let Commands::Cli(args) = cli.command else {
            panic!("expected cli subcommand");
        };
        assert_eq!(args.session.model.as_deref(), Some("gpt-4o"));
        assert_eq!(args.session.temperature, Some(0.7));
        assert_eq!(args.code_theme, Some(gptc_readline::ThemeChoice::Light));
        assert_eq!(args.history_file.as_deref(), Some(std::path::Path::new("/tmp/h")));
    }

    #[test]
    fn test_parse_webapp_subcommand() {
        let cli = Cli::try_parse_from([
            "gptc",
            "webapp",
            "--port",
            "9000",
            "--allow-injections",
            "false",
            "--debug",
        ])
        .unwrap();
        let Commands::Webapp(args) = cli.command else {
            panic!("expected webapp subcommand");
        };
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.host, None);
        assert_eq!(args.session.allow_injections, Some(false));
        assert!(args.session.debug);
    }

    #[test]
    fn test_terminal_only_flags_are_rejected_for_webapp() {
        assert!(Cli::try_parse_from(["gptc", "webapp", "--code-theme", "dark"]).is_err());
        assert!(Cli::try_parse_from(["gptc", "cli", "--port", "1"]).is_err());
        assert!(Cli::try_parse_from(["gptc", "cli", "--code-theme", "monokai"]).is_err());
    }
}
