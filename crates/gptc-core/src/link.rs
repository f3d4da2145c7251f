//! Link expansion: turns a `<<URL>>` address into injectable page text.

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info, warn};

use crate::error::{FetchError, TurnAbort};

/// Retrieves a web page and reduces it to its visible text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError>;
}

/// Asks the operator whether an oversized page may be truncated and sent.
///
/// Implementations block until the operator answers.
pub trait TruncationPrompt {
    fn confirm_truncation(&mut self, original_len: usize, max_chars: usize) -> bool;
}

/// Answers every truncation question the same way. Used where no operator is present.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl TruncationPrompt for AutoConfirm {
    fn confirm_truncation(&mut self, original_len: usize, max_chars: usize) -> bool {
        debug!(original_len, max_chars, accept = self.0, "auto-answering truncation prompt");
        self.0
    }
}

/// Result of expanding one link tag.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// Page text to append as an extra user turn.
    Injected(String),
    /// The tag held nothing fetchable; the turn continues without page text.
    NoAddress(String),
    /// The turn must be dropped.
    Aborted(TurnAbort),
}

/// Validates a captured address.
///
/// Only absolute http(s) URLs are usable.
pub fn parse_address(address: &str) -> Result<Url, String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err("empty link tag".to_string());
    }
    let url = Url::parse(trimmed).map_err(|e| format!("'{trimmed}' is not a valid URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported URL scheme '{other}'")),
    }
}

/// Replaces line breaks with single spaces so the page reads as one passage.
pub fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Explanation prepended to a truncated page.
pub fn truncation_preamble(original_len: usize, max_chars: usize) -> String {
    let percent = max_chars as f64 / original_len as f64 * 100.0;
    format!(
        "GPT please note that due to length, webpage truncated to first {max_chars} characters, \
         about {percent:.1}% of the original {original_len} characters, which may affect your \
         interpretation of it:\n------------------\n"
    )
}

/// Fetches `address` and returns text ready for injection.
///
/// The cap applies to the page body only; the preamble added on truncation
/// is not counted.
pub async fn expand_link<P>(
    address: &str,
    max_chars: usize,
    fetcher: &dyn PageFetcher,
    prompt: &mut P,
) -> LinkOutcome
where
    P: TruncationPrompt + ?Sized,
{
    let url = match parse_address(address) {
        Ok(url) => url,
        Err(reason) => {
            warn!(%reason, "ignoring unusable link tag");
            return LinkOutcome::NoAddress(reason);
        }
    };

    info!(%url, "fetching linked page");
    let text = match fetcher.fetch_text(&url).await {
        Ok(text) => flatten_newlines(&text),
        Err(err) => {
            warn!(%url, error = %err, "page fetch failed");
            return LinkOutcome::Aborted(TurnAbort::FetchFailed(err));
        }
    };

    let original_len = text.chars().count();
    if original_len <= max_chars {
        debug!(original_len, "injecting page text");
        return LinkOutcome::Injected(text);
    }

    if !prompt.confirm_truncation(original_len, max_chars) {
        info!(original_len, max_chars, "operator declined truncation");
        return LinkOutcome::Aborted(TurnAbort::UserAborted);
    }

    let body: String = text.chars().take(max_chars).collect();
    LinkOutcome::Injected(truncation_preamble(original_len, max_chars) + &body)
}
