//! Host OS I/O and system library for an embedded scripting runtime.
//!
//! [`IoLibrary`] owns a handle registry, the three standard streams, and the
//! current default input and output. Everything the runtime touches goes
//! through an explicit library instance; there is no process-global state,
//! so two instances in one process do not see each other's handles or
//! defaults.
//!
//! Reading is delegated to `scriptio-core`, which implements the tokenized
//! read modes (`*n`, `*l`, `*a`, `*w`, fixed counts) over an abstract byte
//! stream. This crate supplies the OS-backed streams, the handle lifecycle,
//! and the system services (`execute`, `date`, temporary names, ...).
//!
//! ```no_run
//! use scriptio::{IoLibrary, ReadMode};
//!
//! # fn main() -> scriptio::Result<()> {
//! let lib = IoLibrary::new();
//! let file = lib.open("notes.txt", "r")?;
//! if let Some(outcomes) = lib.read(Some(file), &[ReadMode::Line])? {
//!     println!("{outcomes:?}");
//! }
//! lib.close(Some(file))?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

mod error;
mod handle;
mod os;

use std::io;
use std::time::Instant;

use parking_lot::Mutex;

use scriptio_core::file::{self, OpenFlags};
use scriptio_core::locale::{self, Category};
use scriptio_core::number::format_number;
use scriptio_core::process::clamp_exit_status;
use scriptio_core::read;
use scriptio_core::stream::ReaderStream;

use crate::handle::{HandleKind, Registry};

pub use crate::error::{LibError, Result};
pub use crate::handle::HandleId;
pub use scriptio_core::file::Whence;
pub use scriptio_core::process::ExecStatus;
pub use scriptio_core::read::{ReadError, ReadMode, ReadOutcome, Value};

/// Default format for [`IoLibrary::date`].
const DEFAULT_DATE_FORMAT: &str = "%c";

/// An I/O library instance: handle registry, standard streams, and the
/// current default input and output.
pub struct IoLibrary {
    registry: Registry,
    stdin: HandleId,
    stdout: HandleId,
    stderr: HandleId,
    default_input: Mutex<HandleId>,
    default_output: Mutex<HandleId>,
    start: Instant,
}

impl IoLibrary {
    /// A fresh instance with defaults bound to the standard streams.
    #[must_use]
    pub fn new() -> Self {
        let registry = Registry::new();
        let stdin = registry.insert("<stdin>", HandleKind::Stdin(ReaderStream::new(io::stdin())));
        let stdout = registry.insert("<stdout>", HandleKind::Stdout(io::stdout()));
        let stderr = registry.insert("<stderr>", HandleKind::Stderr(io::stderr()));
        Self {
            registry,
            stdin,
            stdout,
            stderr,
            default_input: Mutex::new(stdin),
            default_output: Mutex::new(stdout),
            start: Instant::now(),
        }
    }

    // -- standard streams ---------------------------------------------------

    /// The standard input handle.
    #[must_use]
    pub fn stdin(&self) -> HandleId {
        self.stdin
    }

    /// The standard output handle.
    #[must_use]
    pub fn stdout(&self) -> HandleId {
        self.stdout
    }

    /// The standard error handle.
    #[must_use]
    pub fn stderr(&self) -> HandleId {
        self.stderr
    }

    /// The current default input handle.
    #[must_use]
    pub fn current_input(&self) -> HandleId {
        *self.default_input.lock()
    }

    /// The current default output handle.
    #[must_use]
    pub fn current_output(&self) -> HandleId {
        *self.default_output.lock()
    }

    // -- opening and closing ------------------------------------------------

    /// Open `path` with a `fopen`-style mode string (`r`, `w`, `a`, with an
    /// optional `b` suffix) and register a new handle.
    pub fn open(&self, path: &str, mode: &str) -> Result<HandleId> {
        let flags = file::parse_mode(mode)
            .ok_or_else(|| LibError::InvalidOpenMode(mode.to_string()))?;
        let kind = handle::open_file(path, flags)?;
        Ok(self.registry.insert(path, kind))
    }

    /// Close a handle, or the current default output when `id` is `None`.
    ///
    /// Closing a standard stream is accepted and does nothing; the stream
    /// stays open. Closing an already-closed handle is use-after-close.
    pub fn close(&self, id: Option<HandleId>) -> Result<()> {
        let id = id.unwrap_or_else(|| self.current_output());
        let handle = self.registry.get(id)?;
        let mut guard = handle.lock();
        if guard.is_std() {
            return Ok(());
        }
        if !guard.state.is_open() {
            return Err(LibError::UseAfterClose);
        }
        guard.shutdown()
    }

    /// The registered name of a handle, open or closed.
    pub fn handle_name(&self, id: HandleId) -> Result<String> {
        Ok(self.registry.get(id)?.lock().name.clone())
    }

    /// True while the handle has not been closed.
    pub fn is_open(&self, id: HandleId) -> Result<bool> {
        Ok(self.registry.get(id)?.lock().state.is_open())
    }

    // -- reading ------------------------------------------------------------

    /// Read from a handle (or the default input) with the given modes.
    ///
    /// An empty mode list means one plain line. Returns `Ok(None)` when the
    /// very first mode fails with nothing usable, which is how end-of-stream
    /// is reported; hard faults (closed handle, retired pattern mode, OS
    /// errors) come back as `Err`.
    pub fn read(
        &self,
        id: Option<HandleId>,
        modes: &[ReadMode],
    ) -> Result<Option<Vec<ReadOutcome>>> {
        let id = id.unwrap_or_else(|| self.current_input());
        let handle = self.registry.get(id)?;
        let mut guard = handle.lock();
        if !guard.state.is_open() {
            return Err(LibError::UseAfterClose);
        }
        let stream = guard.reader()?;
        let outcomes = if modes.is_empty() {
            read::read_many(stream, &[ReadMode::default()])?
        } else {
            read::read_many(stream, modes)?
        };
        if let Some(err) = guard.take_read_error() {
            return Err(LibError::Io(err));
        }
        Ok(if outcomes.is_empty() { None } else { Some(outcomes) })
    }

    /// Parse textual read specifiers (`"*n"`, `"*l"`, ...) into modes.
    pub fn read_specs(&self, specs: &[&str]) -> Result<Vec<ReadMode>> {
        specs
            .iter()
            .map(|s| ReadMode::from_spec(s).map_err(LibError::from))
            .collect()
    }

    // -- writing ------------------------------------------------------------

    /// Write values to a handle, or the default output when `id` is `None`.
    ///
    /// Numbers are rendered with 16 significant digits, byte strings are
    /// written verbatim. Nothing is appended between or after values.
    pub fn write(&self, id: Option<HandleId>, values: &[Value]) -> Result<()> {
        let id = id.unwrap_or_else(|| self.current_output());
        let handle = self.registry.get(id)?;
        let mut guard = handle.lock();
        if !guard.state.is_open() {
            return Err(LibError::UseAfterClose);
        }
        let sink = guard.writer()?;
        for value in values {
            match value {
                Value::Number(n) => sink.write_all(format_number(*n).as_bytes())?,
                Value::Bytes(b) => sink.write_all(b)?,
            }
        }
        Ok(())
    }

    /// Reposition a file handle and return the new offset from the start.
    pub fn seek(&self, id: HandleId, whence: Whence, offset: i64) -> Result<u64> {
        let handle = self.registry.get(id)?;
        let mut guard = handle.lock();
        if !guard.state.is_open() {
            return Err(LibError::UseAfterClose);
        }
        guard.seek(whence, offset)
    }

    /// [`seek`](Self::seek) with a textual origin: `set`, `cur`, or `end`.
    pub fn seek_named(&self, id: HandleId, whence: &str, offset: i64) -> Result<u64> {
        let whence = Whence::from_name(whence)
            .ok_or_else(|| LibError::InvalidWhence(whence.to_string()))?;
        self.seek(id, whence, offset)
    }

    /// Flush a handle, or both current defaults when `id` is `None`.
    pub fn flush(&self, id: Option<HandleId>) -> Result<()> {
        match id {
            Some(id) => self.flush_one(id),
            None => {
                self.flush_one(self.current_output())?;
                self.flush_one(self.current_input())
            }
        }
    }

    fn flush_one(&self, id: HandleId) -> Result<()> {
        let handle = self.registry.get(id)?;
        let mut guard = handle.lock();
        if !guard.state.is_open() {
            return Err(LibError::UseAfterClose);
        }
        guard.flush()
    }

    // -- default redirection ------------------------------------------------

    /// Redirect the default input.
    ///
    /// `None` closes the current non-standard default and restores standard
    /// input. `Some(spec)` opens `spec` for reading, or spawns it as a shell
    /// pipeline when it starts with `|`. On failure the default is left
    /// unchanged.
    pub fn read_from(&self, spec: Option<&str>) -> Result<HandleId> {
        match spec {
            None => {
                let previous = self.current_input();
                if previous != self.stdin {
                    self.close(Some(previous))?;
                }
                *self.default_input.lock() = self.stdin;
                Ok(self.stdin)
            }
            Some(spec) => {
                let (name, kind) = match spec.strip_prefix('|') {
                    Some(cmd) => (spec, handle::open_pipe_read(cmd)?),
                    None => (spec, handle::open_file(spec, OpenFlags::read())?),
                };
                let id = self.registry.insert(name, kind);
                *self.default_input.lock() = id;
                Ok(id)
            }
        }
    }

    /// Redirect the default output; the `None`/pipe conventions match
    /// [`read_from`](Self::read_from), with `w`-style truncation.
    pub fn write_to(&self, spec: Option<&str>) -> Result<HandleId> {
        self.redirect_output(spec, false)
    }

    /// Redirect the default output, opening files in append mode.
    pub fn append_to(&self, spec: &str) -> Result<HandleId> {
        self.redirect_output(Some(spec), true)
    }

    fn redirect_output(&self, spec: Option<&str>, append: bool) -> Result<HandleId> {
        match spec {
            None => {
                let previous = self.current_output();
                if previous != self.stdout {
                    self.close(Some(previous))?;
                }
                *self.default_output.lock() = self.stdout;
                Ok(self.stdout)
            }
            Some(spec) => {
                let (name, kind) = match spec.strip_prefix('|') {
                    Some(cmd) => (spec, handle::open_pipe_write(cmd)?),
                    None => {
                        let flags = if append {
                            OpenFlags::append()
                        } else {
                            OpenFlags::write()
                        };
                        (spec, handle::open_file(spec, flags)?)
                    }
                };
                let id = self.registry.insert(name, kind);
                *self.default_output.lock() = id;
                Ok(id)
            }
        }
    }

    // -- operating system ---------------------------------------------------

    /// Run a command through the platform shell and wait for it.
    pub fn execute(&self, cmd: &str) -> Result<ExecStatus> {
        os::execute(cmd)
    }

    /// Delete a file.
    pub fn remove(&self, path: &str) -> Result<()> {
        std::fs::remove_file(path)?;
        Ok(())
    }

    /// Rename (move) a file.
    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        std::fs::rename(from, to)?;
        Ok(())
    }

    /// A fresh name in the system temporary directory. No file is created.
    pub fn tmp_name(&self) -> Result<String> {
        let path = os::tmp_name()?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// The value of an environment variable, if set.
    pub fn getenv(&self, name: &str) -> Result<Option<String>> {
        if !scriptio_core::env::valid_name(name) {
            return Err(LibError::InvalidEnvName(name.to_string()));
        }
        Ok(os::getenv(name))
    }

    /// Seconds elapsed since this instance was created.
    #[must_use]
    pub fn clock(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// The current UTC time rendered through a `strftime`-style format.
    /// `None` uses the conventional `%c` representation.
    pub fn date(&self, format: Option<&str>) -> Result<String> {
        os::date(format.unwrap_or(DEFAULT_DATE_FORMAT))
    }

    /// Report whether a locale is available for a category.
    ///
    /// Only the `C` locale (and its aliases) is supported; requesting it
    /// returns its canonical name, anything else returns `None`. Unknown
    /// category names are an error.
    pub fn set_locale(&self, name: &str, category: Option<&str>) -> Result<Option<&'static str>> {
        let category_name = category.unwrap_or("all");
        let _: Category = Category::from_name(category_name)
            .ok_or_else(|| LibError::InvalidLocaleCategory(category_name.to_string()))?;
        Ok(if locale::is_c_locale(name) {
            Some(locale::C_LOCALE)
        } else {
            None
        })
    }

    /// Terminate the process with `code`, clamped to what the OS reports.
    pub fn exit(&self, code: i32) -> ! {
        std::process::exit(clamp_exit_status(code))
    }
}

impl Default for IoLibrary {
    fn default() -> Self {
        Self::new()
    }
}
