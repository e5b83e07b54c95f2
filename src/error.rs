use reqwest::StatusCode;
use thiserror::Error;

/// Ways a search request can fail. Every variant ends up as a fetch failure.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search API answered with status {0}")]
    Status(StatusCode),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request worker exited without a result")]
    WorkerLost,
}
