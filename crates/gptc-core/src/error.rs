//! Error types for gptc.
//!
//! Every per-turn failure is recoverable: the session reports it and keeps
//! reading input. Only [`ConfigError`] is fatal, and only at startup.

use thiserror::Error;

/// Startup configuration problems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required credential is absent from the environment.
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    /// A configuration value is outside its allowed range.
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },

    /// The configuration file could not be read or parsed.
    #[error("Could not load configuration file: {0}")]
    File(String),
}

impl ConfigError {
    /// Creates an InvalidValue error
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Failures while retrieving a page for link injection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The server answered with a non-success status code.
    #[error("Sorry, HTTP error: {status} in trying to access URL..")]
    Http { status: u16 },

    /// The address could not be reached (DNS, refused connection, TLS...).
    #[error("Sorry, URL error: {reason} in trying to access URL.")]
    Url { reason: String },

    /// The request did not finish in time.
    #[error("Sorry, URL error: request timed out in trying to access URL.")]
    Timeout,

    /// Anything else (unreadable body, client construction...).
    #[error("Unexpected error while fetching URL: {0}")]
    Other(String),
}

/// Reasons a turn is abandoned before anything is sent to the completion service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TurnAbort {
    /// The linked page could not be fetched.
    #[error(transparent)]
    FetchFailed(#[from] FetchError),

    /// The operator declined to send a truncated page.
    #[error("Ok, skipping this input; nothing was sent.")]
    UserAborted,
}

/// Failures reported by the completion service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// The credential was rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The service rejected the request as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The service reported an error of its own.
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Too many requests for the account or the model.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The transcript no longer fits in the model context.
    #[error("request too large: {0}")]
    TooLong(String),

    /// The request timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The service could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// Anything not classified above.
    #[error("{0}")]
    Other(String),
}

impl CompletionError {
    /// The message shown to the operator for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(msg) | Self::InvalidRequest(msg) => {
                format!("OpenAI API Error: {msg}")
            }
            Self::Service { message, .. } => format!("OpenAI API Error: {message}"),
            Self::RateLimited(msg) => format!("Sorry, hit a too-many-users limit: {msg}."),
            Self::TooLong(msg) => format!("Sorry, hit a too-long-submission limit: {msg}."),
            Self::Timeout(msg) => format!("Sorry, request apparently timed out: {msg}."),
            Self::Connection(msg) => {
                format!("Sorry, could not connect to the completion service: {msg}.")
            }
            Self::Other(msg) => format!("An error occurred: {msg}"),
        }
    }

    /// Check if this failure is a rate limit
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Check if this failure came from the transport rather than the service
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}
