//! Error model
//!
//! Every failure a run can hit is a [`HeadError`]. Errors never cross
//! component boundaries as control flow: the runner reports each one as a
//! single diagnostic line and folds it into the run's failure flag.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`HeadError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    OpenError,
    ReadError,
    WriteError,
    CloseError,
}

/// Rejected value for the `-n` option
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineCountError {
    #[error("not a number: {0}")]
    NotANumber(String),

    #[error("out of range: {0}")]
    OutOfRange(String),
}

#[derive(Debug, Error)]
pub enum HeadError {
    #[error(transparent)]
    LineCount(#[from] LineCountError),

    /// Any other command-line problem (unknown option, missing value, ...)
    #[error("{0}")]
    Usage(String),

    #[error("open: {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("read: {name}: {source}")]
    Read { name: String, source: io::Error },

    #[error("write: {name}: {source}")]
    Write { name: String, source: io::Error },

    #[error("write: header for {name}: {source}")]
    Banner { name: String, source: io::Error },

    #[error("write: separator: {source}")]
    Separator { source: io::Error },

    #[error("close: {}: {source}", .path.display())]
    Close { path: PathBuf, source: io::Error },
}

impl HeadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HeadError::LineCount(_) | HeadError::Usage(_) => ErrorKind::InvalidArgument,
            HeadError::Open { .. } => ErrorKind::OpenError,
            HeadError::Read { .. } => ErrorKind::ReadError,
            HeadError::Write { .. } | HeadError::Banner { .. } | HeadError::Separator { .. } => {
                ErrorKind::WriteError
            }
            HeadError::Close { .. } => ErrorKind::CloseError,
        }
    }
}
