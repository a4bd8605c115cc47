//! Library error taxonomy.
//!
//! Read failures (end-of-stream, malformed numbers) are outcomes, never
//! errors; everything here is a hard fault returned to the caller. Nothing
//! aborts the process except the explicit `exit` operation.

use std::io;

use thiserror::Error;

use scriptio_core::read::ReadError;
use scriptio_core::time::DateFormatError;

/// Hard faults surfaced by the library.
#[derive(Debug, Error)]
pub enum LibError {
    /// Operation on a handle that was already closed.
    #[error("cannot access a closed file")]
    UseAfterClose,
    /// Handle id unknown to this library instance.
    #[error("invalid file handle")]
    InvalidHandle,
    /// Read requested on a handle that was not opened for reading.
    #[error("file is not open for reading")]
    NotReadable,
    /// Write requested on a handle that was not opened for writing.
    #[error("file is not open for writing")]
    NotWritable,
    /// Seek requested on a stream with no position (pipe, standard stream).
    #[error("file is not seekable")]
    NotSeekable,
    /// Open-mode string outside the `r`/`w`/`a` grammar.
    #[error("invalid open mode `{0}`")]
    InvalidOpenMode(String),
    /// Seek origin name other than `set`, `cur`, `end`.
    #[error("invalid seek origin `{0}`")]
    InvalidWhence(String),
    /// Locale category name outside the known set.
    #[error("invalid locale category `{0}`")]
    InvalidLocaleCategory(String),
    /// Malformed environment variable name.
    #[error("invalid environment variable name `{0}`")]
    InvalidEnvName(String),
    /// Hard faults from the reader core (retired pattern mode, bad format).
    #[error(transparent)]
    Read(#[from] ReadError),
    /// Unrenderable date format.
    #[error(transparent)]
    DateFormat(#[from] DateFormatError),
    /// Operating system failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LibError>;
