use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use gptc_web::WebState;

use super::logging;
use super::options::{Backends, SessionArgs, load_settings, session_config};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7860;

#[derive(Debug, Args)]
pub struct WebappArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Address to listen on (default 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default 7860)
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run(args: WebappArgs) -> Result<()> {
    let _guard = logging::init(args.session.debug, true)?;

    let settings = load_settings()?;
    let config = session_config(&args.session, &settings)?;
    let backends = Backends::from_env()?;

    let host = args
        .host
        .or(settings.web.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = args.port.or(settings.web.port).unwrap_or(DEFAULT_PORT);

    let state = WebState {
        config: Arc::new(config),
        completion: Arc::new(backends.completion),
        fetcher: Arc::new(backends.fetcher),
        accept_truncation: settings.web.accept_truncation.unwrap_or(true),
    };

    gptc_web::serve(&host, port, state).await
}
