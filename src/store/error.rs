use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to determine cache directory")]
    DirResolution,

    #[error("Failed to create store directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Store path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to read document '{key}' from '{path}'")]
    Read {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write document '{key}' to '{path}'")]
    Write {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
