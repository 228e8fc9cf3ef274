//! Error types for assistant integration

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Assistant command failed (exit {status}): {stderr}")]
    CommandFailed { status: i32, stderr: String },

    #[error("Assistant command timed out after {0} seconds")]
    Timeout(u64),

    #[error("Assistant returned an empty response")]
    EmptyResponse,

    #[error("Assistant command not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
