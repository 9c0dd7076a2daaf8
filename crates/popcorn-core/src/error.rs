use thiserror::Error;

/// Failure to read or write the local store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize stored value: {0}")]
    Serialize(#[from] serde_json::Error),
}
