use thiserror::Error;

/// Failure of a single remote call
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Request(error)
        }
    }
}

/// A detail document that yielded no recognizable fields
#[derive(Debug, Error)]
#[error("no labelled fields found in detail page for {0}")]
pub struct ParseError(pub String);

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown source: {name}. Available sources: {}", available.join(", "))]
    UnknownSource { name: String, available: Vec<String> },

    #[error("failed to set up source {name}")]
    Setup {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
