//! Error types for blockindex.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in blockindex.
///
/// A missing key is never an error: `search` reports absence as `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the backing file or a CSV stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Target path for `create`/`extract` already exists.
    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Block 0 does not carry the expected magic bytes; the file is not a
    /// recognized index.
    #[error("not a recognized index file (bad magic)")]
    InvalidFormat,

    /// CSV record without exactly two integer fields.
    ///
    /// Swallowed per-record during bulk load; the batch continues.
    #[error("malformed record: {0:?}")]
    MalformedRecord(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            kind => Error::MalformedRecord(format!("{kind:?}")),
        }
    }
}
