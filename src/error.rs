//! Per-event failures. Any of these discards the current event only.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SendError {
    /// An attached image could not be opened or read
    #[error("Error reading {part} file {path}: {source}")]
    Image {
        part: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error computing authentication digest: {0}")]
    Digest(#[from] openssl::error::ErrorStack),

    #[error("Invalid connector endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Error in sending request: {0}")]
    Transport(String),

    #[error("Error reading from response: {0}")]
    ResponseRead(#[source] std::io::Error),

    /// The blocking send task panicked or was cancelled
    #[error("Send task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SendError>;
