//! Accumulator buffer for assembling read results.
//!
//! One read call owns one accumulator: reset at the start, appended to while
//! scanning, drained into the result value at the end. The contents are raw
//! bytes only; no partially-decoded state is ever stored in it.

use crate::stream::ByteStream;

/// Initial capacity reserved for line-oriented reads.
pub const LINE_CHUNK: usize = 256;

/// Block size for whole-stream draining.
pub const FILE_CHUNK: usize = 8192;

/// Growable byte buffer with explicit reset/drain lifecycle.
#[derive(Debug, Default)]
pub struct Accumulator {
    data: Vec<u8>,
}

impl Accumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator with `capacity` bytes pre-reserved.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Discard any accumulated bytes, keeping the allocation.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Append a single byte.
    pub fn push(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Append a slice of bytes.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Pull up to `max` bytes from `stream`, returning how many arrived.
    ///
    /// A short count means the stream is exhausted (or failed; the stream
    /// records which).
    pub fn append_from<S: ByteStream + ?Sized>(&mut self, stream: &mut S, max: usize) -> usize {
        stream.read_block(&mut self.data, max)
    }

    /// Number of bytes accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The accumulated bytes.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    /// Drop the most recently accumulated byte (used to strip terminators).
    pub fn pop(&mut self) -> Option<u8> {
        self.data.pop()
    }

    /// Drain the accumulated bytes into an owned vector, leaving the
    /// accumulator empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}
