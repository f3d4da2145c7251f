//! Options shared by both subcommands, layered over the settings file.

use anyhow::{Context, Result};
use clap::Args;
use gptc_core::{CompletionService, ConfigError, PageFetcher, SessionConfig};
use gptc_infrastructure::{ConfigStorage, FileConfig, api_key_from_env, base_url_from_env};
use gptc_interaction::{HttpPageFetcher, OpenAiClient};
use tracing::info;

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Completion model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling mass (0.0 to 1.0)
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Character cap for page text injected from <<URL>> tags
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Expand <<URL>> tags (true/false)
    #[arg(long, value_name = "BOOL")]
    pub allow_injections: Option<bool>,

    /// Show token counts around each reply (true/false)
    #[arg(long, value_name = "BOOL")]
    pub show_usage: Option<bool>,

    /// System prompt that opens every conversation
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Log at debug level, including each submitted transcript
    #[arg(long)]
    pub debug: bool,
}

impl SessionArgs {
    /// Overrides `base` with every flag that was given.
    pub fn apply(&self, mut base: SessionConfig) -> SessionConfig {
        if let Some(model) = &self.model {
            base.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            base.temperature = temperature;
        }
        if let Some(top_p) = self.top_p {
            base.top_p = top_p;
        }
        if let Some(max_chars) = self.max_chars {
            base.max_injected_chars = max_chars;
        }
        if let Some(allow) = self.allow_injections {
            base.allow_injections = allow;
        }
        if let Some(show) = self.show_usage {
            base.show_usage = show;
        }
        if let Some(prompt) = &self.system_prompt {
            base.system_prompt = prompt.clone();
        }
        base
    }
}

/// Loads the settings file.
pub fn load_settings() -> Result<FileConfig> {
    let storage = ConfigStorage::new().map_err(ConfigError::from)?;
    load_settings_from(&storage)
        .with_context(|| format!("Failed to load {}", storage.path().display()))
}

fn load_settings_from(storage: &ConfigStorage) -> Result<FileConfig, ConfigError> {
    Ok(storage.load()?)
}

/// Final session config: defaults, then the settings file, then flags.
pub fn session_config(args: &SessionArgs, settings: &FileConfig) -> Result<SessionConfig> {
    let config = args.apply(settings.session.clone());
    config.validate()?;
    Ok(config)
}

/// Network collaborators built from the environment.
pub struct Backends {
    pub completion: OpenAiClient,
    pub fetcher: HttpPageFetcher,
}

impl Backends {
    pub fn from_env() -> Result<Self> {
        let api_key = api_key_from_env()?;
        let mut completion = OpenAiClient::new(api_key)?;
        if let Some(base_url) = base_url_from_env() {
            completion = completion.with_base_url(base_url);
        }
        info!(base_url = completion.base_url(), "completion endpoint configured");
        Ok(Self {
            completion,
            fetcher: HttpPageFetcher::new()?,
        })
    }

    pub fn completion(&self) -> &dyn CompletionService {
        &self.completion
    }

    pub fn fetcher(&self) -> &dyn PageFetcher {
        &self.fetcher
    }
}
