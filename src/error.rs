//! Error types for the adapter
//!
//! Only configuration problems and transport failures against the upstream
//! identity provider are errors. Malformed token responses, undecodable ID
//! tokens and cache misses are ordinary outcomes and never become an
//! `AdapterError`.

use thiserror::Error;

/// Main error type for adapter operations
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Network-specific errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        AdapterError::Network(NetworkError::Reqwest(err))
    }
}

/// Convenient result type for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

impl AdapterError {
    /// Create a config error
    #[inline]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AdapterError::Config(msg.into())
    }

    /// Create a network error
    #[inline]
    pub fn network<S: Into<String>>(msg: S) -> Self {
        AdapterError::Network(NetworkError::Http(msg.into()))
    }
}
