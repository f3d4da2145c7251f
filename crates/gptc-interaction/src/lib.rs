//! Network collaborators for the gptc session engine.

pub mod openai_client;
pub mod page_fetcher;

pub use openai_client::OpenAiClient;
pub use page_fetcher::HttpPageFetcher;
