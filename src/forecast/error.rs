use crate::store::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Forecast response from {url} is not a JSON object with a 'data' array")]
    InvalidResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to serialize forecast entry {index}")]
    Serialize {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to store forecast entry")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Document at key '{key}' is not a valid JSON object")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record store unavailable while reading '{key}'")]
    StoreUnavailable {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Record store unavailable: {timeouts} lookups in a row timed out (last key '{key}')")]
    StoreTimedOut { key: String, timeouts: u32 },
}
