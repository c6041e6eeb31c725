use crate::core::path::PathError;
use thiserror::Error;

/// wfdocs unified error type
#[derive(Error, Debug)]
pub enum WfDocsError {
    #[error(
        "Missing required environment variables: {} (set them in the environment or a .env file)",
        .missing.join(", ")
    )]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(String),
}

pub type WfDocsResult<T> = Result<T, WfDocsError>;
