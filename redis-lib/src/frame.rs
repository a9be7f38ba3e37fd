//! Provides a type representing a Redis protocol frame as well as utilities for
//! parsing frames from a byte array.

use atoi::FromRadix10SignedChecked;
use bytes::{Buf, Bytes};
use std::fmt;
use std::io::Cursor;
use std::string::FromUtf8Error;

/// A frame in the Redis protocol.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

#[derive(Debug)]
pub enum Error {
    /// Not enough data is available to parse a message
    Incomplete,

    /// Invalid message encoding
    Other(String),
}

impl Frame {
    /// Checks if an entire message can be decoded from `src`.
    ///
    /// On success the cursor is left just past the end of the frame.
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<(), Error> {
        match get_u8(src)? {
            b'+' | b'-' => {
                get_line(src)?;
                Ok(())
            }
            b':' => {
                let _ = get_integer(src)?;
                Ok(())
            }
            b'$' => {
                let len = get_integer(src)?;
                if len < 0 {
                    // `$-1\r\n` is the null bulk string.
                    return Ok(());
                }

                // skip the payload and its trailing \r\n
                skip(src, len as usize + 2)
            }
            b'*' => {
                let len = get_integer(src)?;
                for _ in 0..len.max(0) {
                    Frame::check(src)?;
                }

                Ok(())
            }
            actual => Err(format!("protocol error; invalid frame type byte `{actual}`").into()),
        }
    }

    /// The message has already been validated with `check`.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Frame, Error> {
        match get_u8(src)? {
            b'+' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Simple(String::from_utf8(line)?))
            }
            b'-' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Error(String::from_utf8(line)?))
            }
            b':' => Ok(Frame::Integer(get_integer(src)?)),
            b'$' => {
                let len = get_integer(src)?;
                if len < 0 {
                    return Ok(Frame::Null);
                }

                let len = len as usize;
                let n = len + 2;
                if src.remaining() < n {
                    return Err(Error::Incomplete);
                }

                let data = Bytes::copy_from_slice(&src.chunk()[..len]);
                if &src.chunk()[len..n] != b"\r\n" {
                    return Err("protocol error; invalid bulk terminator".into());
                }
                skip(src, n)?;

                Ok(Frame::Bulk(data))
            }
            b'*' => {
                let len = get_integer(src)?;
                if len < 0 {
                    // `*-1\r\n` is the null array, e.g. an aborted `EXEC`.
                    return Ok(Frame::Null);
                }

                let mut out = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    out.push(Frame::parse(src)?);
                }

                Ok(Frame::Array(out))
            }
            actual => Err(format!("protocol error; invalid frame type byte `{actual}`").into()),
        }
    }

    /// Converts the frame to an "unexpected frame" error
    pub(crate) fn to_error(&self) -> crate::Error {
        crate::Error::Protocol(format!("unexpected frame: {self}"))
    }
}

impl PartialEq<&str> for Frame {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Frame::Simple(s) => s.eq(other),
            Frame::Bulk(s) => s.eq(other),
            _ => false,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use std::str;

        match self {
            Frame::Simple(response) => write!(fmt, "{response}"),
            Frame::Error(msg) => write!(fmt, "error: {msg}"),
            Frame::Integer(num) => write!(fmt, "{num}"),
            Frame::Bulk(msg) => match str::from_utf8(msg) {
                Ok(string) => write!(fmt, "{string}"),
                Err(_) => write!(fmt, "{msg:?}"),
            },
            Frame::Null => write!(fmt, "(nil)"),
            Frame::Array(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(fmt, " ")?;
                    }
                    write!(fmt, "{part}")?;
                }

                Ok(())
            }
        }
    }
}

fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }

    Ok(src.get_u8())
}

fn skip(src: &mut Cursor<&[u8]>, n: usize) -> Result<(), Error> {
    if src.remaining() < n {
        return Err(Error::Incomplete);
    }

    src.advance(n);
    Ok(())
}

/// Read a signed decimal terminated by `\r\n`.
fn get_integer(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    let line = get_line(src)?;

    parse_decimal(line).ok_or_else(|| "protocol error; invalid frame format".into())
}

/// Parse the whole of `src` as a decimal number.
///
/// Trailing bytes, an empty input and values out of range for `T` are all
/// rejected.
pub(crate) fn parse_decimal<T: FromRadix10SignedChecked>(src: &[u8]) -> Option<T> {
    match T::from_radix_10_signed_checked(src) {
        (Some(value), used) if used == src.len() && src.iter().any(u8::is_ascii_digit) => Some(value),
        _ => None,
    }
}

/// Find a line
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let end = src.get_ref().len().saturating_sub(1);

    for i in start..end {
        if src.get_ref()[i] == b'\r' && src.get_ref()[i + 1] == b'\n' {
            // We found a line, update the position to be *after* the \n
            src.set_position((i + 2) as u64);

            return Ok(&src.get_ref()[start..i]);
        }
    }

    Err(Error::Incomplete)
}

impl From<String> for Error {
    fn from(src: String) -> Error {
        Error::Other(src)
    }
}

impl From<&str> for Error {
    fn from(src: &str) -> Error {
        src.to_string().into()
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        "protocol error; invalid frame format".into()
    }
}

impl From<Error> for crate::Error {
    fn from(src: Error) -> crate::Error {
        match src {
            Error::Incomplete => crate::Error::Protocol("incomplete frame".to_string()),
            Error::Other(msg) => crate::Error::Protocol(msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Incomplete => write!(fmt, "stream ended early"),
            Error::Other(msg) => write!(fmt, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(src: &[u8]) -> Result<Frame, Error> {
        let mut buf = Cursor::new(src);
        Frame::check(&mut buf)?;
        let len = buf.position() as usize;
        assert_eq!(len, src.len(), "check must consume the whole frame");

        buf.set_position(0);
        Frame::parse(&mut buf)
    }

    #[test]
    fn parses_status_and_error_lines() {
        assert_eq!(decode(b"+OK\r\n").unwrap(), Frame::Simple("OK".into()));
        assert_eq!(
            decode(b"-ERR invalid password\r\n").unwrap(),
            Frame::Error("ERR invalid password".into())
        );
    }

    #[test]
    fn parses_negative_integers() {
        assert_eq!(decode(b":-2\r\n").unwrap(), Frame::Integer(-2));
    }

    #[test]
    fn parses_binary_and_empty_bulk() {
        assert_eq!(
            decode(b"$4\r\na\r\nb\r\n").unwrap(),
            Frame::Bulk(Bytes::from_static(b"a\r\nb"))
        );
        assert_eq!(decode(b"$0\r\n\r\n").unwrap(), Frame::Bulk(Bytes::new()));
        assert_eq!(decode(b"$-1\r\n").unwrap(), Frame::Null);
    }

    #[test]
    fn parses_nested_and_null_arrays() {
        let frame = decode(b"*2\r\n:1\r\n*1\r\n$3\r\nfoo\r\n").unwrap();
        assert_eq!(
            frame,
            Frame::Array(vec![
                Frame::Integer(1),
                Frame::Array(vec![Frame::Bulk(Bytes::from_static(b"foo"))]),
            ])
        );
        assert_eq!(decode(b"*-1\r\n").unwrap(), Frame::Null);
    }

    #[test]
    fn partial_input_is_incomplete() {
        for src in [&b"$5\r\nhel"[..], b"*2\r\n:1\r\n", b"+PON"] {
            let mut buf = Cursor::new(src);
            assert!(matches!(Frame::check(&mut buf), Err(Error::Incomplete)));
        }
    }

    #[test]
    fn integer_lines_must_be_whole_numbers() {
        for src in [&b":12abc\r\n"[..], b":\r\n", b":-\r\n", b"$3x\r\nfoo\r\n"] {
            let mut buf = Cursor::new(src);
            assert!(matches!(Frame::check(&mut buf), Err(Error::Other(_))), "{src:?}");
        }
    }

    #[test]
    fn decimals_reject_trailing_bytes_and_overflow() {
        assert_eq!(parse_decimal::<i64>(b"-42"), Some(-42));
        assert_eq!(parse_decimal::<u64>(b"18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_decimal::<i64>(b"12abc"), None);
        assert_eq!(parse_decimal::<i64>(b"3QUEUED"), None);
        assert_eq!(parse_decimal::<i64>(b""), None);
        assert_eq!(parse_decimal::<u64>(b"-1"), None);
        assert_eq!(parse_decimal::<u32>(b"4294967296"), None);
    }

    #[test]
    fn unknown_type_byte_is_rejected() {
        let mut buf = Cursor::new(&b"?oops\r\n"[..]);
        assert!(matches!(Frame::check(&mut buf), Err(Error::Other(_))));
    }
}
