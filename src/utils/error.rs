// src/utils/error.rs
use thiserror::Error;

// Errors raised while talking to the OpenDART registry
#[derive(Error, Debug)]
pub enum DartError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 503 Service Unavailable

    #[error("OpenDART returned status {status}: {message}")]
    Api { status: String, message: String },

    #[error("Failed to parse OpenDART response: {0}")]
    Parse(String),

    #[error("Filings for {0} are not cached and fetching is disabled")]
    NotCached(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    #[error("Invalid company '{0}', expected NAME=CORP_CODE")]
    InvalidCompany(String),

    #[error("No OpenDART API key; pass --api-key or set DART_API_KEY")]
    MissingApiKey,

    #[error("Invalid rule set: {0}")]
    InvalidRules(String),

    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("OpenDART interaction failed: {0}")]
    Dart(#[from] DartError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
