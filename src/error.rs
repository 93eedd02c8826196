use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Value of {len} bytes exceeds capacity of {capacity} bytes")]
    LengthExceeded { len: usize, capacity: usize },

    #[error("Value contains a NUL byte")]
    InteriorNul,

    #[error("Storage access of {len} bytes at offset {offset} exceeds region of {capacity} bytes")]
    StorageOutOfBounds { offset: usize, len: usize, capacity: usize },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Config error: {field}: {error}")]
    Config { field: String, error: String },

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl From<&str> for WatcherError {
    fn from(error: &str) -> Self {
        WatcherError::RuntimeError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WatcherError>;
