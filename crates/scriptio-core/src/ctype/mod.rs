//! Byte classification.
//!
//! The reader tokenizes raw bytes, so classification follows the C-locale
//! `<ctype.h>` rules rather than Unicode: a "word" is delimited by the six
//! classic whitespace bytes and nothing else.

/// Returns `true` if `c` is a whitespace byte.
///
/// Equivalent to C `isspace` in the "C" locale: space, tab, newline,
/// vertical tab, form feed, carriage return.
#[must_use]
pub const fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Returns `true` if `c` is a decimal digit.
#[must_use]
pub const fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}
