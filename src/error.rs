use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid format value: {0}")]
    InvalidFormat(String),

    #[error("Invalid operation argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Unable to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record could not be decoded. `record` is 1-based.
    #[error("Invalid geometry at record {record}: {message}")]
    Decode { record: usize, message: String },

    #[error("{op}: {message}")]
    Engine { op: &'static str, message: String },
}

impl Error {
    pub(crate) fn decode(record: usize, message: impl Into<String>) -> Self {
        Error::Decode {
            record,
            message: message.into(),
        }
    }
}
