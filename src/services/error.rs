use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid API response structure")]
    InvalidResponse,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    Listing(#[from] FetchError),

    #[error("An aggregation run is already in progress")]
    AlreadyRunning,
}
