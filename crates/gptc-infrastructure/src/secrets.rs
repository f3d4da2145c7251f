//! Credentials and endpoint overrides from the process environment.

use gptc_core::ConfigError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Reads the API key; absence is fatal for the caller.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    api_key_from(|name| std::env::var(name).ok())
}

/// Returns the base URL override, if set and non-blank.
pub fn base_url_from_env() -> Option<String> {
    base_url_from(|name| std::env::var(name).ok())
}

fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    lookup(API_KEY_VAR)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ConfigError::MissingCredential(API_KEY_VAR.to_string()))
}

fn base_url_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    lookup(BASE_URL_VAR)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}
