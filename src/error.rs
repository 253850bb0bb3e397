//! Error types for versa operations.

use thiserror::Error;

use crate::model::DocId;

/// Errors that can occur while importing, querying or rendering documents.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("document not found: {0}")]
    DocumentNotFound(DocId),

    #[error("render error at {event}: {message}")]
    Render { event: String, message: String },

    #[error("USFM parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("query error: {0}")]
    Query(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a render error naming the event being processed.
    pub fn render(event: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Error::Render {
            event: event.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
