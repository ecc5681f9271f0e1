use std::{io, path::PathBuf};

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("InvalidArgument: header size must be 2 or 4, got {0}")]
    InvalidHeaderSize(usize),

    #[error("InvalidArgument: alignment must be at least 2, got {0}")]
    InvalidAlignment(usize),

    #[error("InvalidArgument: status {0} does not fit in a nibble")]
    StatusOutOfRange(u8),

    #[error("InvalidArgument: length {length} exceeds header maximum {max}")]
    LengthOutOfRange { length: usize, max: usize },

    /// The header at `offset` was read in full but its payload was cut short.
    #[error("Corruption: incomplete data at position {offset}: expected {expected} bytes, got {actual}")]
    TruncatedRecord {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("NotFound: {}: {source}", path.display())]
    NotFound { path: PathBuf, source: io::Error },

    #[error("IOError: {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl Error {
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound { path, source },
            _ => Error::Io { path, source },
        }
    }

    /// True for errors raised while validating configuration or header
    /// arguments, before any I/O happens.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::InvalidHeaderSize(_)
                | Error::InvalidAlignment(_)
                | Error::StatusOutOfRange(_)
                | Error::LengthOutOfRange { .. }
        )
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::TruncatedRecord { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
