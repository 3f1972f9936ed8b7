use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Failures of a single call against the recent-search endpoint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TwitterApiError {
    #[error("Rate limit exceeded (status {status:?})")]
    RateLimitExceeded {
        status: Option<u16>,
        headers: BTreeMap<String, String>,
    },

    #[error("Invalid bearer token")]
    InvalidToken,

    #[error("Forbidden access to resource: {resource}")]
    Forbidden { resource: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },

    #[error("Request failed with status {status_code}: {body}")]
    RequestFailed { status_code: u16, body: String },

    #[error("Network failure: {message}")]
    Network { message: String },

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },
}

/// Terminal outcome of a fetch. Every failure that crosses the fetch boundary
/// is one of these variants.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum FetchError {
    #[error("No credentials: {message}")]
    NoCredentials { message: String },

    #[error("Rate limit exceeded. Retry after {wait_seconds} seconds")]
    RateLimited {
        wait_seconds: u64,
        status: Option<u16>,
        headers: BTreeMap<String, String>,
    },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl FetchError {
    pub fn no_credentials() -> Self {
        FetchError::NoCredentials {
            message: "BEARER_TOKEN is not set or invalid. Set it in .env or environment."
                .to_string(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        FetchError::Unexpected {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Environment variable not set: {var_name}")]
    MissingEnvironmentVariable { var_name: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
