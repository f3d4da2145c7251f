//! Fetches linked pages and reduces them to readable text.

use std::time::Duration;

use async_trait::async_trait;
use gptc_core::{FetchError, PageFetcher};
use reqwest::{Client, Url};
use tracing::debug;

/// Some sites refuse requests without a browser-like agent string.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// [`PageFetcher`] over plain HTTP(S).
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|err| FetchError::Other(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(map_transport_error)?;
        debug!(%url, bytes = html.len(), "page downloaded");
        Ok(html_to_text(&html))
    }
}

/// Strips markup, keeping the visible text.
pub fn html_to_text(html: &str) -> String {
    nanohtml2text::html2text(html)
}

fn map_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() || err.is_request() || err.is_redirect() {
        FetchError::Url {
            reason: err.to_string(),
        }
    } else {
        FetchError::Other(err.to_string())
    }
}
