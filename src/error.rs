use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while generating, writing or reading address traces.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A generation parameter was out of range (zero count, zero step,
    /// empty loop set, address overflow).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A directory or file could not be created, opened or written.
    #[error("filesystem error on {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A trace file or address literal did not have the expected shape.
    #[error("malformed trace: {0}")]
    Format(String),

    #[error("invalid job file: {0}")]
    Config(#[from] serde_json::Error),
}

impl TraceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        TraceError::InvalidParameter(msg.into())
    }

    pub fn filesystem(path: &Path, source: io::Error) -> Self {
        TraceError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TraceError>;
