//! Tokenized stream reading.
//!
//! One read call takes a stream and a mode and produces exactly one decoded
//! value, leaving the stream positioned immediately after the consumed token
//! (with at most one byte of lookahead pushed back). End-of-stream with
//! nothing consumed is a normal failed outcome, not an error; only the
//! retired pattern mode and malformed format specifiers raise hard errors.

use thiserror::Error;

use crate::buffer::{Accumulator, FILE_CHUNK, LINE_CHUNK};
use crate::ctype::{is_digit, is_space};
use crate::stream::ByteStream;

// ---------------------------------------------------------------------------
// Modes and outcomes
// ---------------------------------------------------------------------------

/// Strategy governing a single read invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadMode {
    /// Longest numeric prefix, parsed as a float (`*n`).
    Number,
    /// Bytes up to and excluding the next newline (`*l`).
    Line,
    /// Next whitespace-delimited word (`*w`).
    Word,
    /// Everything remaining in the stream (`*a`).
    All,
    /// Exactly this many bytes.
    Exact(usize),
    /// Retired glob-like matching. Kept as a named variant for interface
    /// compatibility; selecting it is always a hard error.
    Pattern(String),
}

impl ReadMode {
    /// Parse a format specifier: `*n`, `*l`, `*a`, or `*w`.
    ///
    /// A specifier without the leading `*` selects the retired pattern
    /// mode; `*` followed by anything else is an invalid format.
    pub fn from_spec(spec: &str) -> Result<ReadMode, ReadError> {
        match spec.strip_prefix('*') {
            Some(rest) => match rest.as_bytes().first() {
                Some(b'n') => Ok(ReadMode::Number),
                Some(b'l') => Ok(ReadMode::Line),
                Some(b'a') => Ok(ReadMode::All),
                Some(b'w') => Ok(ReadMode::Word),
                _ => Err(ReadError::InvalidFormat(spec.to_string())),
            },
            None => Ok(ReadMode::Pattern(spec.to_string())),
        }
    }
}

impl Default for ReadMode {
    /// A read with no specifier means "one line".
    fn default() -> Self {
        ReadMode::Line
    }
}

/// A decoded read result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bytes(Vec<u8>),
}

impl Value {
    /// The numeric payload, if this value is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bytes(_) => None,
        }
    }

    /// The byte payload, if this value is a byte string.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Number(_) => None,
            Value::Bytes(b) => Some(b),
        }
    }
}

/// Outcome of one completed sub-read.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The mode matched and the token was consumed.
    Complete(Value),
    /// A fixed-count read hit end-of-stream early. The partial payload is
    /// still surfaced so the caller can decide whether it is usable.
    Truncated(Vec<u8>),
}

/// Hard read faults. Failed matches are outcomes, not errors; these abort
/// the whole call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The retired pattern mode was requested.
    #[error("read patterns are deprecated")]
    UnsupportedMode,
    /// A format specifier that names no mode.
    #[error("invalid read format `{0}`")]
    InvalidFormat(String),
}

// ---------------------------------------------------------------------------
// Single-mode scanners
// ---------------------------------------------------------------------------

/// Scan the longest prefix matching the float grammar and parse it.
///
/// Leading whitespace is skipped first, then an optional sign, digits, an
/// optional fraction, and an optional signed exponent. On success the
/// delimiting byte (if any) is pushed back. A scan that consumes candidate
/// bytes which then fail to parse (for example `12e+`) leaves them
/// consumed, as a C `%lf` conversion would; a first byte that cannot start
/// a number is pushed back untouched.
pub fn read_number<S: ByteStream + ?Sized>(stream: &mut S) -> Option<f64> {
    let mut c = stream.next_byte();
    while let Some(b) = c {
        if !is_space(b) {
            break;
        }
        c = stream.next_byte();
    }

    let mut text = Vec::new();
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut in_exponent = false;
    // A sign is legal at the very start and right after the exponent marker.
    let mut sign_ok = true;
    loop {
        match c {
            Some(b) if is_digit(b) => {
                seen_digit = true;
                sign_ok = false;
                text.push(b);
            }
            Some(b @ (b'+' | b'-')) if sign_ok => {
                sign_ok = false;
                text.push(b);
            }
            Some(b'.') if !seen_dot && !in_exponent => {
                seen_dot = true;
                sign_ok = false;
                text.push(b'.');
            }
            Some(b @ (b'e' | b'E')) if seen_digit && !in_exponent => {
                in_exponent = true;
                sign_ok = true;
                text.push(b);
            }
            other => {
                if let Some(b) = other {
                    stream.push_back(b);
                }
                break;
            }
        }
        c = stream.next_byte();
    }

    // The scan admits only ASCII, so the conversion cannot fail.
    let text = std::str::from_utf8(&text).ok()?;
    text.parse::<f64>().ok()
}

/// Accumulate bytes up to and excluding the next `\n`; the terminator
/// itself is consumed.
///
/// Returns `false` when end-of-stream arrives before a terminator, even if
/// bytes were accumulated: an unterminated final line is a failed read and
/// the caller discards the partial content.
pub fn read_line<S: ByteStream + ?Sized>(stream: &mut S, acc: &mut Accumulator) -> bool {
    loop {
        match stream.next_byte() {
            Some(b'\n') => return true,
            Some(b) => acc.push(b),
            None => return false,
        }
    }
}

/// Skip leading whitespace, then accumulate bytes until the next whitespace
/// byte, which is pushed back rather than consumed.
///
/// An empty accumulation means the stream had nothing left; the dispatch
/// layer resolves that against the buffer length ("must read something to
/// succeed").
pub fn read_word<S: ByteStream + ?Sized>(stream: &mut S, acc: &mut Accumulator) {
    let mut c = stream.next_byte();
    while let Some(b) = c {
        if !is_space(b) {
            break;
        }
        c = stream.next_byte();
    }
    while let Some(b) = c {
        if is_space(b) {
            stream.push_back(b);
            return;
        }
        acc.push(b);
        c = stream.next_byte();
    }
}

/// Drain every remaining byte in `FILE_CHUNK`-sized blocks. Always
/// succeeds, possibly with zero bytes.
pub fn read_all<S: ByteStream + ?Sized>(stream: &mut S, acc: &mut Accumulator) {
    while acc.append_from(stream, FILE_CHUNK) == FILE_CHUNK {}
}

/// Read up to `count` bytes; `true` only if all of them arrived.
///
/// On a short read the partial bytes stay in the accumulator, mirroring
/// short-read semantics of block I/O.
pub fn read_exact<S: ByteStream + ?Sized>(
    stream: &mut S,
    acc: &mut Accumulator,
    count: usize,
) -> bool {
    acc.append_from(stream, count) == count
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Perform a single read. `Ok(None)` is the failed outcome: the stream was
/// exhausted before anything matched.
pub fn read_one<S: ByteStream + ?Sized>(
    stream: &mut S,
    mode: &ReadMode,
) -> Result<Option<ReadOutcome>, ReadError> {
    let mut acc = Accumulator::with_capacity(LINE_CHUNK);
    read_into(stream, mode, &mut acc)
}

fn read_into<S: ByteStream + ?Sized>(
    stream: &mut S,
    mode: &ReadMode,
    acc: &mut Accumulator,
) -> Result<Option<ReadOutcome>, ReadError> {
    acc.reset();
    let outcome = match mode {
        ReadMode::Number => {
            read_number(stream).map(|n| ReadOutcome::Complete(Value::Number(n)))
        }
        ReadMode::Line => {
            read_line(stream, acc).then(|| ReadOutcome::Complete(Value::Bytes(acc.take())))
        }
        ReadMode::Word => {
            read_word(stream, acc);
            (!acc.is_empty()).then(|| ReadOutcome::Complete(Value::Bytes(acc.take())))
        }
        ReadMode::All => {
            read_all(stream, acc);
            Some(ReadOutcome::Complete(Value::Bytes(acc.take())))
        }
        ReadMode::Exact(count) => {
            if read_exact(stream, acc, *count) {
                Some(ReadOutcome::Complete(Value::Bytes(acc.take())))
            } else if acc.is_empty() {
                None
            } else {
                Some(ReadOutcome::Truncated(acc.take()))
            }
        }
        ReadMode::Pattern(_) => return Err(ReadError::UnsupportedMode),
    };
    Ok(outcome)
}

/// Process an ordered sequence of modes against one stream.
///
/// Sub-reads run in order and the sequence stops at the first one that does
/// not complete: a truncated fixed-count payload is included as the final
/// result, a failed sub-read is not. An empty result list therefore means
/// the very first sub-read failed with nothing to show.
pub fn read_many<S: ByteStream + ?Sized>(
    stream: &mut S,
    modes: &[ReadMode],
) -> Result<Vec<ReadOutcome>, ReadError> {
    let mut results = Vec::with_capacity(modes.len());
    let mut acc = Accumulator::with_capacity(LINE_CHUNK);
    for mode in modes {
        match read_into(stream, mode, &mut acc)? {
            Some(done @ ReadOutcome::Complete(_)) => results.push(done),
            Some(cut @ ReadOutcome::Truncated(_)) => {
                results.push(cut);
                break;
            }
            None => break,
        }
    }
    Ok(results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SliceStream;

    fn stream(bytes: &[u8]) -> SliceStream {
        SliceStream::new(bytes)
    }

    // ── number mode ─────────────────────────────────────────────────

    #[test]
    fn number_skips_whitespace_and_stops_at_delimiter() {
        let mut s = stream(b"  -3.5e2 rest");
        assert_eq!(read_number(&mut s), Some(-350.0));
        assert_eq!(s.remaining(), b" rest");
    }

    #[test]
    fn number_plain_integer() {
        let mut s = stream(b"42");
        assert_eq!(read_number(&mut s), Some(42.0));
        assert_eq!(s.remaining(), b"");
    }

    #[test]
    fn number_fraction_without_leading_digit() {
        let mut s = stream(b".5x");
        assert_eq!(read_number(&mut s), Some(0.5));
        assert_eq!(s.remaining(), b"x");
    }

    #[test]
    fn number_rejects_non_numeric_start_without_consuming() {
        let mut s = stream(b"word");
        assert_eq!(read_number(&mut s), None);
        assert_eq!(s.remaining(), b"word");
    }

    #[test]
    fn number_bare_sign_fails() {
        let mut s = stream(b"- 5");
        assert_eq!(read_number(&mut s), None);
        assert_eq!(s.remaining(), b" 5");
    }

    #[test]
    fn number_dangling_exponent_fails_with_bytes_consumed() {
        let mut s = stream(b"12e+;");
        assert_eq!(read_number(&mut s), None);
        assert_eq!(s.remaining(), b";");
    }

    #[test]
    fn number_exponent_marker_needs_a_digit_before_it() {
        let mut s = stream(b"e5");
        assert_eq!(read_number(&mut s), None);
        assert_eq!(s.remaining(), b"e5");
    }

    #[test]
    fn number_only_one_dot_is_consumed() {
        let mut s = stream(b"1.2.3");
        assert_eq!(read_number(&mut s), Some(1.2));
        assert_eq!(s.remaining(), b".3");
    }

    #[test]
    fn number_at_end_of_stream_fails() {
        let mut s = stream(b"   ");
        assert_eq!(read_number(&mut s), None);
    }

    // ── line mode ───────────────────────────────────────────────────

    #[test]
    fn line_without_terminator_fails() {
        let mut s = stream(b"no newline here");
        let mut acc = Accumulator::new();
        assert!(!read_line(&mut s, &mut acc));
    }

    #[test]
    fn line_consumes_terminator_but_excludes_it() {
        let mut s = stream(b"first\nsecond");
        let mut acc = Accumulator::new();
        assert!(read_line(&mut s, &mut acc));
        assert_eq!(acc.contents(), b"first");
        assert_eq!(s.remaining(), b"second");
    }

    #[test]
    fn empty_line_succeeds_with_zero_bytes() {
        let mut s = stream(b"\nrest");
        let mut acc = Accumulator::new();
        assert!(read_line(&mut s, &mut acc));
        assert!(acc.is_empty());
        assert_eq!(s.remaining(), b"rest");
    }

    #[test]
    fn line_longer_than_growth_chunk() {
        let long: Vec<u8> = std::iter::repeat(b'x')
            .take(LINE_CHUNK * 3 + 17)
            .chain([b'\n'])
            .collect();
        let mut s = stream(&long);
        let mut acc = Accumulator::new();
        assert!(read_line(&mut s, &mut acc));
        assert_eq!(acc.len(), LINE_CHUNK * 3 + 17);
    }

    // ── word mode ───────────────────────────────────────────────────

    #[test]
    fn word_skips_leading_whitespace_and_pushes_back_delimiter() {
        let mut s = stream(b" \t\nalpha beta");
        let mut acc = Accumulator::new();
        read_word(&mut s, &mut acc);
        assert_eq!(acc.contents(), b"alpha");
        assert_eq!(s.remaining(), b" beta");
    }

    #[test]
    fn word_at_end_of_stream_is_empty() {
        let mut s = stream(b"   ");
        let mut acc = Accumulator::new();
        read_word(&mut s, &mut acc);
        assert!(acc.is_empty());
    }

    #[test]
    fn word_ending_at_end_of_stream_keeps_its_bytes() {
        let mut s = stream(b"tail");
        let mut acc = Accumulator::new();
        read_word(&mut s, &mut acc);
        assert_eq!(acc.contents(), b"tail");
    }

    // ── whole-stream mode ───────────────────────────────────────────

    #[test]
    fn all_on_empty_stream_succeeds_with_nothing() {
        let mut s = stream(b"");
        let mut acc = Accumulator::new();
        read_all(&mut s, &mut acc);
        assert!(acc.is_empty());
    }

    #[test]
    fn all_drains_across_block_boundaries() {
        let data: Vec<u8> = (0..FILE_CHUNK * 2 + 5).map(|i| (i % 251) as u8).collect();
        let mut s = stream(&data);
        let mut acc = Accumulator::new();
        read_all(&mut s, &mut acc);
        assert_eq!(acc.contents(), &data[..]);
    }

    #[test]
    fn all_equals_concatenated_exact_drains() {
        let data = b"one two three\nfour";
        let mut whole = Accumulator::new();
        read_all(&mut stream(data), &mut whole);

        let mut pieces = Accumulator::new();
        let mut s = stream(data);
        while read_exact(&mut s, &mut pieces, 7) {}
        assert_eq!(whole.contents(), pieces.contents());
    }

    // ── fixed-count mode ────────────────────────────────────────────

    #[test]
    fn exact_succeeds_with_exactly_n_bytes() {
        let mut s = stream(b"abcdefgh");
        let mut acc = Accumulator::new();
        assert!(read_exact(&mut s, &mut acc, 5));
        assert_eq!(acc.contents(), b"abcde");
        assert_eq!(s.remaining(), b"fgh");
    }

    #[test]
    fn exact_short_read_keeps_partial_bytes() {
        let mut s = stream(b"abc");
        let mut acc = Accumulator::new();
        assert!(!read_exact(&mut s, &mut acc, 5));
        assert_eq!(acc.contents(), b"abc");
    }

    #[test]
    fn exact_zero_bytes_always_succeeds() {
        let mut s = stream(b"");
        let mut acc = Accumulator::new();
        assert!(read_exact(&mut s, &mut acc, 0));
        assert!(acc.is_empty());
    }

    // ── dispatch ────────────────────────────────────────────────────

    #[test]
    fn read_one_word_resolves_empty_buffer_to_failure() {
        let mut s = stream(b"  \t ");
        assert_eq!(read_one(&mut s, &ReadMode::Word), Ok(None));
    }

    #[test]
    fn read_one_truncated_exact_surfaces_partial_payload() {
        let mut s = stream(b"abc");
        let got = read_one(&mut s, &ReadMode::Exact(5)).unwrap();
        assert_eq!(got, Some(ReadOutcome::Truncated(b"abc".to_vec())));
    }

    #[test]
    fn read_one_pattern_is_a_hard_error() {
        let mut s = stream(b"anything");
        assert_eq!(
            read_one(&mut s, &ReadMode::Pattern("{%d}".into())),
            Err(ReadError::UnsupportedMode)
        );
        // Nothing was consumed by the rejected mode.
        assert_eq!(s.remaining(), b"anything");
    }

    #[test]
    fn read_many_number_then_line() {
        let mut s = stream(b"42\nhello\n");
        let got = read_many(&mut s, &[ReadMode::Number, ReadMode::Line]).unwrap();
        assert_eq!(
            got,
            vec![
                ReadOutcome::Complete(Value::Number(42.0)),
                ReadOutcome::Complete(Value::Bytes(b"hello".to_vec())),
            ]
        );
    }

    #[test]
    fn read_many_stops_after_first_failed_subread() {
        let mut s = stream(b"only\n");
        let got = read_many(&mut s, &[ReadMode::Line, ReadMode::Line]).unwrap();
        assert_eq!(
            got,
            vec![ReadOutcome::Complete(Value::Bytes(b"only".to_vec()))]
        );
    }

    #[test]
    fn read_many_failed_first_subread_returns_nothing() {
        let mut s = stream(b"");
        let got = read_many(&mut s, &[ReadMode::Line, ReadMode::All]).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn read_many_includes_trailing_truncated_payload() {
        let mut s = stream(b"ab\ncd");
        let got = read_many(&mut s, &[ReadMode::Line, ReadMode::Exact(4), ReadMode::Line]).unwrap();
        assert_eq!(
            got,
            vec![
                ReadOutcome::Complete(Value::Bytes(b"ab".to_vec())),
                ReadOutcome::Truncated(b"cd".to_vec()),
            ]
        );
    }

    #[test]
    fn unterminated_final_line_fails_even_with_content() {
        let mut s = stream(b"first\npartial");
        let got = read_many(&mut s, &[ReadMode::Line, ReadMode::Line]).unwrap();
        assert_eq!(
            got,
            vec![ReadOutcome::Complete(Value::Bytes(b"first".to_vec()))]
        );
    }

    // ── specifier parsing ───────────────────────────────────────────

    #[test]
    fn spec_strings_map_to_modes() {
        assert_eq!(ReadMode::from_spec("*n"), Ok(ReadMode::Number));
        assert_eq!(ReadMode::from_spec("*l"), Ok(ReadMode::Line));
        assert_eq!(ReadMode::from_spec("*a"), Ok(ReadMode::All));
        assert_eq!(ReadMode::from_spec("*w"), Ok(ReadMode::Word));
    }

    #[test]
    fn spec_without_star_is_the_retired_pattern_mode() {
        assert_eq!(
            ReadMode::from_spec("%d+"),
            Ok(ReadMode::Pattern("%d+".into()))
        );
    }

    #[test]
    fn spec_with_unknown_star_letter_is_invalid() {
        assert_eq!(
            ReadMode::from_spec("*q"),
            Err(ReadError::InvalidFormat("*q".into()))
        );
        assert_eq!(
            ReadMode::from_spec("*"),
            Err(ReadError::InvalidFormat("*".into()))
        );
    }

    #[test]
    fn default_mode_is_line() {
        assert_eq!(ReadMode::default(), ReadMode::Line);
    }
}
