//! Error types for switchdl

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for switchdl operations
#[derive(Debug, Error)]
pub enum SwitchdlError {
    /// Conflicting flags or arguments, reported before anything is attempted
    #[error("{0}")]
    Validation(String),

    /// Missing or unusable credential
    #[error("{0}")]
    Auth(String),

    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("unexpected status code for {context}: {status}")]
    UnexpectedStatus { context: &'static str, status: u16 },

    #[error("request for {context} failed: {source}")]
    Request {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download failed: {0}")]
    DownloadFailed(#[from] reqwest::Error),

    #[error("no video/mp4 variant found for video ID: {video_id}")]
    NoVariant { video_id: String },

    #[error(
        "output file {} already exists. Use -w / --overwrite to replace it or -s / --skip to skip",
        .path.display()
    )]
    Collision { path: PathBuf },

    #[error("failed to read user input: {0}")]
    Input(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("keyring error: {0}. Ensure the keyring service is running and you have appropriate permissions")]
    Keyring(#[from] keyring::Error),

    #[error("invalid config file {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl SwitchdlError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SwitchdlError::Validation(_) | SwitchdlError::Config { .. } => 2,
            SwitchdlError::Auth(_) | SwitchdlError::Keyring(_) => 3,
            SwitchdlError::Cancelled => 130,
            _ => 1,
        }
    }
}
