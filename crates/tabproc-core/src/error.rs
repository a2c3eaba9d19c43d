//! Error types for tabproc-core
//!
//! These cover I/O, configuration and misuse of the table API. Outcomes of
//! validating or running an operation are reported through
//! [`ProcessStatus`](crate::status::ProcessStatus) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabproc-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding label not recognised
    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),

    /// File content is not valid in the configured encoding
    #[error("'{path}' is not valid {encoding} text")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Table text has characters the configured encoding cannot represent
    #[error("cannot write '{path}': text is not representable in {encoding}")]
    Encode {
        path: PathBuf,
        encoding: &'static str,
    },

    /// A DSV separator must contain at least one character
    #[error("separator must not be empty")]
    EmptySeparator,

    /// Malformed value range text
    #[error("invalid range entry '{token}': {reason}")]
    RangeFormat { token: String, reason: String },

    /// A row or column view was used after the table was structurally modified
    #[error("stale {kind} view: captured at generation {captured}, table is at generation {current}")]
    StaleView {
        kind: &'static str,
        captured: u64,
        current: u64,
    },

    /// A row or column view was resolved against a table that did not issue it
    #[error("{kind} view belongs to a different table")]
    ForeignView { kind: &'static str },

    /// Pipeline refers to a table that was not declared
    #[error("unknown table '{0}'")]
    UnknownTable(String),

    /// Regular expression failed to compile
    #[error("invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
