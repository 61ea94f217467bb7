use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Object `{0}` not found")]
    ObjectNotFound(String),
    #[error("Object `{0}` is forbidden")]
    ObjectForbidden(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
