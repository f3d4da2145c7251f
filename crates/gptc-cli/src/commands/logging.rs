use anyhow::{Context, Result};
use gptc_infrastructure::GptcPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Sets up file-based tracing (logs go to ~/.config/gptc/logs/gptc.log.YYYY-MM-DD).
///
/// `GPTC_LOG` selects the filter (default `warn`); `debug` forces `debug`.
/// The returned guard must live until exit so buffered lines are written.
pub fn init(debug: bool, also_stderr: bool) -> Result<WorkerGuard> {
    let logs_dir = GptcPaths::logs_dir()?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&logs_dir, "gptc.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("GPTC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(also_stderr.then(|| fmt::layer().with_writer(std::io::stderr)))
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
