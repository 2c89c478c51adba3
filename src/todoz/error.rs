use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodozError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored data under '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Todos are still loading")]
    NotLoaded,

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TodozError>;
