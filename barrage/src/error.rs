use thiserror::Error;

/// Rejected configuration. Raised before any request is dispatched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),

    #[error("Request count must be greater than zero")]
    ZeroRequests,

    #[error("Expected status {0} is not a valid HTTP status code")]
    InvalidStatus(u16),

    #[error("Per-request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Pool size must allow at least one connection per host")]
    ZeroPoolSize,
}

/// Aggregation was asked for a rate or distribution it cannot compute.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DegenerateInputError {
    #[error("No outcomes to aggregate")]
    NoOutcomes,

    #[error("Total elapsed time is zero, request rate is undefined")]
    ZeroElapsed,
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Cannot summarize run: {0}")]
    DegenerateInput(#[from] DegenerateInputError),
}
