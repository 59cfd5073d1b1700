//! Error types for the camt053-writer library.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering a statement.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred while writing to an output sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error serializing the XML document.
    #[error("XML serialization error: {0}")]
    Xml(String),

    /// Missing required field on the input statement.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
