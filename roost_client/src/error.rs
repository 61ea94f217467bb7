use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Service unavailable")]
    ServiceUnavailable,
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("Upstream API error: {0}")]
    Api(String),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Network Error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),
    #[error("Cannot parse URL: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
}
