use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("circuit breaker open for {0}")]
    CircuitOpen(String),
}

pub type Result<T> = std::result::Result<T, HttpError>;
