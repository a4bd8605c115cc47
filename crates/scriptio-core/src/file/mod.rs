//! Open-mode grammar, seek origins, and the handle lifecycle.
//!
//! These are the small pieces of shared vocabulary between the caller and
//! the OS-facing layer: how a file may be opened, where a seek is anchored,
//! and the one-way `Open -> Closed` state of a handle.

/// How a file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    pub readable: bool,
    pub writable: bool,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
    pub binary: bool,
}

/// Parse an open-mode string: `r`, `w`, or `a`, optionally followed by `b`.
///
/// The `b` modifier is accepted and ignored (byte I/O is the only
/// behavior). Update (`+`) modes and anything else unrecognised return
/// `None`.
#[must_use]
pub fn parse_mode(mode: &str) -> Option<OpenFlags> {
    let bytes = mode.as_bytes();
    let mut flags = OpenFlags::default();
    match bytes.first()? {
        b'r' => flags.readable = true,
        b'w' => {
            flags.writable = true;
            flags.create = true;
            flags.truncate = true;
        }
        b'a' => {
            flags.writable = true;
            flags.create = true;
            flags.append = true;
        }
        _ => return None,
    }
    match &bytes[1..] {
        [] => Some(flags),
        [b'b'] => {
            flags.binary = true;
            Some(flags)
        }
        _ => None,
    }
}

impl OpenFlags {
    /// Flags equivalent to mode `r`.
    #[must_use]
    pub const fn read() -> OpenFlags {
        OpenFlags {
            readable: true,
            writable: false,
            append: false,
            truncate: false,
            create: false,
            binary: false,
        }
    }

    /// Flags equivalent to mode `w`.
    #[must_use]
    pub const fn write() -> OpenFlags {
        OpenFlags {
            readable: false,
            writable: true,
            append: false,
            truncate: true,
            create: true,
            binary: false,
        }
    }

    /// Flags equivalent to mode `a`.
    #[must_use]
    pub const fn append() -> OpenFlags {
        OpenFlags {
            readable: false,
            writable: true,
            append: true,
            truncate: false,
            create: true,
            binary: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Seek origins
// ---------------------------------------------------------------------------

/// Seek origin, selected by the names `set`, `cur`, and `end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Whence {
    /// From the start of the file.
    Set,
    /// From the current position (the default origin).
    #[default]
    Cur,
    /// From the end of the file.
    End,
}

impl Whence {
    /// Look up a seek origin by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Whence> {
        match name {
            "set" => Some(Whence::Set),
            "cur" => Some(Whence::Cur),
            "end" => Some(Whence::End),
            _ => None,
        }
    }

    /// The name this origin is selected by.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Whence::Set => "set",
            Whence::Cur => "cur",
            Whence::End => "end",
        }
    }
}

// ---------------------------------------------------------------------------
// Handle lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of a handle: `Open -> Closed`, never back.
///
/// A closed handle stays registered so that later operations can be
/// rejected with a use-after-close error instead of an unknown-handle one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Open,
    Closed,
}

impl HandleState {
    /// True while operations on the handle are still legal.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, HandleState::Open)
    }
}
