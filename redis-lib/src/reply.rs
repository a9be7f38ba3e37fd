//! Reply normalization shared by every command group.
//!
//! `wait_ok` and `wait_convert` are the two adapters command methods chain
//! onto the raw `Pending<Frame>` returned by the connection. `FromFrame`
//! supplies the standard conversion functions handed to `wait_convert`.

use crate::frame::parse_decimal;
use crate::{Frame, Pending};
use atoi::FromRadix10SignedChecked;
use bytes::Bytes;
use std::str;

/// Resolve to `true` iff the reply is the `OK` status.
///
/// Any other reply, including other statuses, integers, bulk strings and
/// error-shaped frames, resolves to `false`. Only a failure of `fut` itself
/// (closed connection, error reply, protocol error) is propagated.
pub fn wait_ok(fut: Pending<Frame>) -> Pending<bool> {
    fut.and_then(|reply| Ok(matches!(reply, Frame::Simple(ref status) if status == "OK")))
}

/// Resolve to `type_fn(reply)`.
///
/// An error returned by `type_fn` fails the pending result unchanged.
pub fn wait_convert<T, F>(fut: Pending<Frame>, type_fn: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce(Frame) -> crate::Result<T> + Send + 'static,
{
    fut.and_then(type_fn)
}

/// Conversion from a raw reply into a typed value.
pub trait FromFrame: Sized {
    fn from_frame(frame: Frame) -> crate::Result<Self>;
}

impl FromFrame for Frame {
    fn from_frame(frame: Frame) -> crate::Result<Frame> {
        Ok(frame)
    }
}

impl FromFrame for () {
    fn from_frame(_frame: Frame) -> crate::Result<()> {
        Ok(())
    }
}

impl FromFrame for Bytes {
    fn from_frame(frame: Frame) -> crate::Result<Bytes> {
        match frame {
            Frame::Bulk(data) => Ok(data),
            Frame::Simple(status) => Ok(Bytes::from(status.into_bytes())),
            frame => Err(frame.to_error()),
        }
    }
}

impl FromFrame for String {
    fn from_frame(frame: Frame) -> crate::Result<String> {
        match frame {
            Frame::Simple(status) => Ok(status),
            Frame::Bulk(data) => str::from_utf8(&data)
                .map(ToString::to_string)
                .map_err(|_| crate::Error::Protocol("invalid utf-8 string".to_string())),
            frame => Err(frame.to_error()),
        }
    }
}

impl FromFrame for i64 {
    fn from_frame(frame: Frame) -> crate::Result<i64> {
        match frame {
            Frame::Integer(value) => Ok(value),
            frame => decimal(frame),
        }
    }
}

/// Non-negative integers such as `SCAN` cursors and `TIME` fields.
impl FromFrame for u64 {
    fn from_frame(frame: Frame) -> crate::Result<u64> {
        match frame {
            Frame::Integer(value) => u64::try_from(value)
                .map_err(|_| crate::Error::Protocol(format!("expected non-negative integer, got {value}"))),
            frame => decimal(frame),
        }
    }
}

/// Some commands return numbers as bulk strings or statuses, e.g. `TIME`
/// and `SCAN`. The whole payload must be the number.
fn decimal<T: FromRadix10SignedChecked>(frame: Frame) -> crate::Result<T> {
    let parsed = match &frame {
        Frame::Bulk(data) => parse_decimal(data),
        Frame::Simple(data) => parse_decimal(data.as_bytes()),
        _ => None,
    };

    parsed.ok_or_else(|| frame.to_error())
}

impl FromFrame for f64 {
    fn from_frame(frame: Frame) -> crate::Result<f64> {
        let parsed = match &frame {
            #[allow(clippy::cast_precision_loss)]
            Frame::Integer(value) => Some(*value as f64),
            Frame::Bulk(data) => str::from_utf8(data).ok().and_then(|s| s.parse().ok()),
            Frame::Simple(data) => data.parse().ok(),
            _ => None,
        };

        parsed.ok_or_else(|| frame.to_error())
    }
}

/// Integer replies `1` / `0`.
impl FromFrame for bool {
    fn from_frame(frame: Frame) -> crate::Result<bool> {
        match frame {
            Frame::Integer(value) => Ok(value != 0),
            frame => Err(frame.to_error()),
        }
    }
}

/// `Null` maps to `None`.
impl<T: FromFrame> FromFrame for Option<T> {
    fn from_frame(frame: Frame) -> crate::Result<Option<T>> {
        match frame {
            Frame::Null => Ok(None),
            frame => T::from_frame(frame).map(Some),
        }
    }
}

impl<T: FromFrame> FromFrame for Vec<T> {
    fn from_frame(frame: Frame) -> crate::Result<Vec<T>> {
        match frame {
            Frame::Array(items) => items.into_iter().map(T::from_frame).collect(),
            frame => Err(frame.to_error()),
        }
    }
}

/// Two-element array replies such as `BLPOP` and `SCAN`.
impl<A: FromFrame, B: FromFrame> FromFrame for (A, B) {
    fn from_frame(frame: Frame) -> crate::Result<(A, B)> {
        match frame {
            Frame::Array(items) => match <[Frame; 2]>::try_from(items) {
                Ok([a, b]) => Ok((A::from_frame(a)?, B::from_frame(b)?)),
                Err(items) => Err(Frame::Array(items).to_error()),
            },
            frame => Err(frame.to_error()),
        }
    }
}

/// Convert a flat `[k1, v1, k2, v2, ...]` array into pairs.
///
/// Used for `HGETALL`, `CONFIG GET` and `ZRANGE ... WITHSCORES`.
pub fn pairs<A: FromFrame, B: FromFrame>(frame: Frame) -> crate::Result<Vec<(A, B)>> {
    let items = match frame {
        Frame::Array(items) if items.len() % 2 == 0 => items,
        frame => return Err(frame.to_error()),
    };

    let mut out = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let (Some(a), Some(b)) = (items.next(), items.next()) {
        out.push((A::from_frame(a)?, B::from_frame(b)?));
    }

    Ok(out)
}
