//! Byte streams with single-byte pushback.
//!
//! The reader consumes an ordered byte source through [`ByteStream`]:
//! `next_byte` advances, `push_back` returns at most one byte of lookahead.
//! [`SliceStream`] serves in-memory input; [`ReaderStream`] adapts any
//! `std::io::Read` with an internal refill buffer and stdio-style
//! end-of-stream and error indicators.

use std::io::{self, Read, Seek, SeekFrom};

/// Ordered byte source with single-byte lookahead.
pub trait ByteStream {
    /// Next byte, or `None` at end-of-stream (or after an I/O failure,
    /// which the implementation records separately).
    fn next_byte(&mut self) -> Option<u8>;

    /// Push one byte of lookahead back onto the stream.
    ///
    /// Only the most recently read byte may be pushed back, and only one
    /// byte may be pending at a time.
    fn push_back(&mut self, byte: u8);

    /// Read up to `max` bytes, appending them to `out`.
    ///
    /// Returns how many bytes were appended; a short count signals
    /// end-of-stream. Implementations may override this with bulk reads.
    fn read_block(&mut self, out: &mut Vec<u8>, max: usize) -> usize {
        let mut n = 0;
        while n < max {
            match self.next_byte() {
                Some(b) => {
                    out.push(b);
                    n += 1;
                }
                None => break,
            }
        }
        n
    }
}

// ---------------------------------------------------------------------------
// In-memory stream
// ---------------------------------------------------------------------------

/// Byte stream over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct SliceStream {
    data: Vec<u8>,
    pos: usize,
}

impl SliceStream {
    /// Create a stream over `data`, positioned at the start.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }
}

impl ByteStream for SliceStream {
    fn next_byte(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn push_back(&mut self, byte: u8) {
        debug_assert!(self.pos > 0, "push_back with nothing consumed");
        self.pos -= 1;
        self.data[self.pos] = byte;
    }
}

// ---------------------------------------------------------------------------
// Reader-backed stream
// ---------------------------------------------------------------------------

/// Byte stream over any `io::Read`, with a refill buffer, one byte of
/// pushback, and sticky end-of-stream/error indicators.
///
/// I/O errors from the underlying reader surface as end-of-stream to the
/// tokenizer; the caller inspects [`ReaderStream::take_error`] to tell the
/// two apart.
#[derive(Debug)]
pub struct ReaderStream<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    pushback: Option<u8>,
    eof: bool,
    error: Option<io::Error>,
    chunk: usize,
}

impl<R: Read> ReaderStream<R> {
    /// Wrap `inner` with the default refill chunk size.
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, crate::buffer::FILE_CHUNK)
    }

    /// Wrap `inner`, refilling `chunk` bytes at a time.
    pub fn with_chunk_size(inner: R, chunk: usize) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            pos: 0,
            pushback: None,
            eof: false,
            error: None,
            chunk: chunk.max(1),
        }
    }

    /// True once the underlying reader has reported end-of-stream.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Take the last I/O error reported by the underlying reader, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Bytes buffered ahead of the logical position (lookahead + pushback).
    fn unread(&self) -> u64 {
        (self.buf.len() - self.pos) as u64 + u64::from(self.pushback.is_some())
    }

    fn refill(&mut self) -> bool {
        self.buf.resize(self.chunk, 0);
        self.pos = 0;
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(0) => {
                    self.buf.clear();
                    self.eof = true;
                    return false;
                }
                Ok(n) => {
                    self.buf.truncate(n);
                    return true;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.clear();
                    self.error = Some(e);
                    return false;
                }
            }
        }
    }
}

impl<R: Read + Seek> ReaderStream<R> {
    /// Logical position: the underlying position minus buffered lookahead.
    pub fn stream_position(&mut self) -> io::Result<u64> {
        let inner_pos = self.inner.stream_position()?;
        Ok(inner_pos - self.unread())
    }

    /// Seek relative to the logical position, discarding lookahead.
    pub fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Current(off) => {
                let cur = self.stream_position()?;
                let dest = i64::try_from(cur)
                    .ok()
                    .and_then(|c| c.checked_add(off))
                    .filter(|d| *d >= 0)
                    .ok_or_else(|| {
                        io::Error::new(io::ErrorKind::InvalidInput, "seek before start of stream")
                    })?;
                SeekFrom::Start(dest as u64)
            }
            other => other,
        };
        self.pushback = None;
        self.buf.clear();
        self.pos = 0;
        self.eof = false;
        self.inner.seek(target)
    }
}

impl<R: Read> ByteStream for ReaderStream<R> {
    fn next_byte(&mut self) -> Option<u8> {
        if let Some(b) = self.pushback.take() {
            return Some(b);
        }
        if self.pos >= self.buf.len() && !self.refill() {
            return None;
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Some(b)
    }

    fn push_back(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "second pushback byte");
        self.pushback = Some(byte);
        self.eof = false;
    }

    fn read_block(&mut self, out: &mut Vec<u8>, max: usize) -> usize {
        let mut n = 0;
        if n < max {
            if let Some(b) = self.pushback.take() {
                out.push(b);
                n += 1;
            }
        }
        let buffered = self.buf.len() - self.pos;
        if n < max && buffered > 0 {
            let take = buffered.min(max - n);
            out.extend_from_slice(&self.buf[self.pos..self.pos + take]);
            self.pos += take;
            n += take;
        }
        // Past the lookahead, read straight into the output.
        while n < max {
            let start = out.len();
            out.resize(start + (max - n), 0);
            match self.inner.read(&mut out[start..]) {
                Ok(0) => {
                    out.truncate(start);
                    self.eof = true;
                    break;
                }
                Ok(k) => {
                    out.truncate(start + k);
                    n += k;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => out.truncate(start),
                Err(e) => {
                    out.truncate(start);
                    self.error = Some(e);
                    break;
                }
            }
        }
        n
    }
}
