//! Handles and the handle registry.
//!
//! Every open stream is a [`Handle`] behind a process-wide id. Handles have
//! a one-way `Open -> Closed` lifecycle; closed handles stay registered so
//! later operations fail with use-after-close instead of unknown-handle.
//! The registry replaces finalizer-driven cleanup: `close` releases
//! resources eagerly, and whatever is still open when the library is
//! dropped goes down with it.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use scriptio_core::file::{HandleState, OpenFlags, Whence};
use scriptio_core::stream::{ByteStream, ReaderStream};

use crate::error::{LibError, Result};

/// Identifier for a registered handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(u64);

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// What a handle is attached to.
pub(crate) enum HandleKind {
    Stdin(ReaderStream<io::Stdin>),
    Stdout(io::Stdout),
    Stderr(io::Stderr),
    ReadFile(ReaderStream<fs::File>),
    WriteFile(BufWriter<fs::File>),
    PipeRead {
        child: Child,
        stream: ReaderStream<ChildStdout>,
    },
    PipeWrite {
        child: Child,
        stdin: Option<ChildStdin>,
    },
    /// Resources already released by `close`.
    Released,
}

pub(crate) struct Handle {
    pub(crate) state: HandleState,
    pub(crate) name: String,
    pub(crate) kind: HandleKind,
}

impl Handle {
    pub(crate) fn new(name: impl Into<String>, kind: HandleKind) -> Self {
        Self {
            state: HandleState::Open,
            name: name.into(),
            kind,
        }
    }

    /// True for the three standard streams, which are never really closed.
    pub(crate) fn is_std(&self) -> bool {
        matches!(
            self.kind,
            HandleKind::Stdin(_) | HandleKind::Stdout(_) | HandleKind::Stderr(_)
        )
    }

    /// The read-side byte stream, if this handle can read.
    pub(crate) fn reader(&mut self) -> Result<&mut dyn ByteStream> {
        match &mut self.kind {
            HandleKind::Stdin(s) => Ok(s),
            HandleKind::ReadFile(s) => Ok(s),
            HandleKind::PipeRead { stream, .. } => Ok(stream),
            _ => Err(LibError::NotReadable),
        }
    }

    /// An OS error recorded by the read side, cleared on return.
    pub(crate) fn take_read_error(&mut self) -> Option<io::Error> {
        match &mut self.kind {
            HandleKind::Stdin(s) => s.take_error(),
            HandleKind::ReadFile(s) => s.take_error(),
            HandleKind::PipeRead { stream, .. } => stream.take_error(),
            _ => None,
        }
    }

    /// The write sink, if this handle can write.
    pub(crate) fn writer(&mut self) -> Result<&mut dyn Write> {
        match &mut self.kind {
            HandleKind::Stdout(s) => Ok(s),
            HandleKind::Stderr(s) => Ok(s),
            HandleKind::WriteFile(w) => Ok(w),
            HandleKind::PipeWrite { stdin, .. } => match stdin {
                Some(s) => Ok(s),
                None => Err(LibError::NotWritable),
            },
            _ => Err(LibError::NotWritable),
        }
    }

    /// Seek a file handle, returning the new logical position.
    pub(crate) fn seek(&mut self, whence: Whence, offset: i64) -> Result<u64> {
        let pos = match whence {
            Whence::Set => SeekFrom::Start(u64::try_from(offset).map_err(|_| {
                LibError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "seek before start of file",
                ))
            })?),
            Whence::Cur => SeekFrom::Current(offset),
            Whence::End => SeekFrom::End(offset),
        };
        match &mut self.kind {
            HandleKind::ReadFile(s) => Ok(s.seek(pos)?),
            HandleKind::WriteFile(w) => Ok(w.seek(pos)?),
            _ => Err(LibError::NotSeekable),
        }
    }

    /// Push buffered writes down to the OS. A no-op for read handles.
    pub(crate) fn flush(&mut self) -> Result<()> {
        match &mut self.kind {
            HandleKind::Stdout(s) => s.flush()?,
            HandleKind::Stderr(s) => s.flush()?,
            HandleKind::WriteFile(w) => w.flush()?,
            HandleKind::PipeWrite {
                stdin: Some(s), ..
            } => s.flush()?,
            _ => {}
        }
        Ok(())
    }

    /// Release OS resources and transition to `Closed`.
    ///
    /// Writers are flushed, pipe children are reaped; the handle is marked
    /// closed even when those steps fail.
    pub(crate) fn shutdown(&mut self) -> Result<()> {
        self.state = HandleState::Closed;
        match std::mem::replace(&mut self.kind, HandleKind::Released) {
            HandleKind::WriteFile(mut w) => {
                w.flush()?;
            }
            HandleKind::PipeRead { mut child, stream } => {
                drop(stream);
                child.wait()?;
            }
            HandleKind::PipeWrite { mut child, stdin } => {
                drop(stdin);
                child.wait()?;
            }
            _ => {}
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Concurrent handle table.
pub(crate) struct Registry {
    handles: RwLock<HashMap<HandleId, Arc<Mutex<Handle>>>>,
    next_id: AtomicU64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            handles: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn insert(&self, name: impl Into<String>, kind: HandleKind) -> HandleId {
        let id = HandleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handles
            .write()
            .insert(id, Arc::new(Mutex::new(Handle::new(name, kind))));
        id
    }

    pub(crate) fn get(&self, id: HandleId) -> Result<Arc<Mutex<Handle>>> {
        self.handles
            .read()
            .get(&id)
            .cloned()
            .ok_or(LibError::InvalidHandle)
    }
}

// ---------------------------------------------------------------------------
// Opening
// ---------------------------------------------------------------------------

/// Open `path` per `flags` and wrap it in the matching handle kind.
pub(crate) fn open_file(path: &str, flags: OpenFlags) -> io::Result<HandleKind> {
    let file = fs::OpenOptions::new()
        .read(flags.readable)
        .write(flags.writable && !flags.append)
        .append(flags.append)
        .truncate(flags.truncate)
        .create(flags.create)
        .open(path)?;
    Ok(if flags.readable {
        HandleKind::ReadFile(ReaderStream::new(file))
    } else {
        HandleKind::WriteFile(BufWriter::new(file))
    })
}

/// Spawn `cmd` through the platform shell with its stdout piped to us.
pub(crate) fn open_pipe_read(cmd: &str) -> io::Result<HandleKind> {
    let mut child = shell_command(cmd).stdout(Stdio::piped()).spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout unavailable"))?;
    Ok(HandleKind::PipeRead {
        child,
        stream: ReaderStream::new(stdout),
    })
}

/// Spawn `cmd` through the platform shell with its stdin piped from us.
pub(crate) fn open_pipe_write(cmd: &str) -> io::Result<HandleKind> {
    let mut child = shell_command(cmd).stdin(Stdio::piped()).spawn()?;
    let stdin = child.stdin.take();
    Ok(HandleKind::PipeWrite { child, stdin })
}

/// The platform shell invocation used for pipes and `execute`.
pub(crate) fn shell_command(cmd: &str) -> Command {
    #[cfg(windows)]
    {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    }
    #[cfg(not(windows))]
    {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}
