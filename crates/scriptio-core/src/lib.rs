//! # scriptio-core
//!
//! Pure logic for the scriptio host I/O library: the tokenized stream
//! reader, the accumulator buffer it assembles results in, byte-stream
//! abstractions with single-byte pushback, and the small grammars the
//! OS-facing crate marshals through (open modes, seek origins, locale
//! categories, calendar formatting, wait-status decoding).
//!
//! Nothing in this crate touches the operating system. Everything is
//! deterministic and testable against in-memory streams; no `unsafe` code
//! is permitted at the crate level.

#![deny(unsafe_code)]

pub mod buffer;
pub mod ctype;
pub mod env;
pub mod file;
pub mod locale;
pub mod number;
pub mod process;
pub mod read;
pub mod stream;
pub mod time;
