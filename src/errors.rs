use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("error communicating with server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Rejected(String),

    #[error("server reported success without updated values")]
    MissingData,
}

impl ClientError {
    pub fn rejected(message: Option<String>) -> Self {
        Self::Rejected(message.unwrap_or_else(|| "Error updating value".to_string()))
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    #[error("please enter a valid non-negative number (got {0:?})")]
    InvalidInput(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field {0} is not editable")]
    NotEditable(String),

    #[error("no row with id {0}")]
    UnknownRow(i64),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read week file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse week file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
