use crate::frame::{self, Frame};
use bytes::{Buf, BufMut, BytesMut};
use std::io::{self, Cursor};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

/// `FrameStream` reads (receives) and writes (sends) `Frame` values on the
/// underlying `TcpStream`.
///
/// `read_buf` is filled up until there are enough bytes to create a full frame.
/// Once this happens, the frame is parsed and returned to the caller.
#[derive(Debug)]
pub struct FrameStream {
    stream: BufWriter<TcpStream>,
    // The buffer for reading frames.
    read_buf: BytesMut,
    // Scratch buffer a frame is encoded into before it is written.
    write_buf: BytesMut,
}

const BUF_SIZE: usize = 4 * 1024;

impl FrameStream {
    pub fn new(stream: TcpStream) -> FrameStream {
        FrameStream {
            stream: BufWriter::new(stream),
            read_buf: BytesMut::with_capacity(BUF_SIZE),
            write_buf: BytesMut::with_capacity(BUF_SIZE),
        }
    }

    /// Read a single `Frame` value from the underlying stream.
    ///
    /// Waits until enough data has been received to parse a frame. Data left
    /// in the read buffer after parsing is kept for the next call. The method
    /// is cancel safe: dropping the returned future loses no buffered bytes.
    ///
    /// # Returns
    ///
    /// `None` if the peer closed the socket on a frame boundary. A close in
    /// the middle of a frame is an error.
    pub async fn read_frame(&mut self) -> crate::Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` indicates "end of stream".
            if 0 == self.stream.read_buf(&mut self.read_buf).await? {
                if self.read_buf.is_empty() {
                    return Ok(None);
                }
                let err = io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer");
                return Err(err.into());
            }
        }
    }

    /// Tries to parse a frame from the buffer. `Ok(None)` means more data is
    /// needed.
    fn parse_frame(&mut self) -> crate::Result<Option<Frame>> {
        use frame::Error::Incomplete;

        let mut buf = Cursor::new(&self.read_buf[..]);

        // `check` is cheaper than a full parse and avoids allocating until the
        // whole frame is known to be buffered.
        match Frame::check(&mut buf) {
            Ok(()) => {
                let len = usize::try_from(buf.position())
                    .map_err(|_| crate::Error::Protocol("frame too large".to_string()))?;

                buf.set_position(0);
                let frame = Frame::parse(&mut buf)?;
                self.read_buf.advance(len);

                Ok(Some(frame))
            }
            Err(Incomplete) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a single `Frame` to the underlying stream and flush it.
    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.write_buf.clear();
        encode(frame, &mut self.write_buf);

        self.stream.write_all(&self.write_buf).await?;
        self.stream.flush().await
    }
}

/// Encode `frame` in RESP2, recursing into arrays.
fn encode(frame: &Frame, dst: &mut BytesMut) {
    match frame {
        Frame::Simple(val) => {
            dst.put_u8(b'+');
            dst.put_slice(val.as_bytes());
            dst.put_slice(b"\r\n");
        }
        Frame::Error(val) => {
            dst.put_u8(b'-');
            dst.put_slice(val.as_bytes());
            dst.put_slice(b"\r\n");
        }
        Frame::Integer(val) => {
            dst.put_u8(b':');
            put_decimal(dst, *val);
        }
        Frame::Null => dst.put_slice(b"$-1\r\n"),
        Frame::Bulk(val) => {
            dst.put_u8(b'$');
            put_decimal(dst, val.len() as i64);
            dst.put_slice(val);
            dst.put_slice(b"\r\n");
        }
        Frame::Array(items) => {
            dst.put_u8(b'*');
            put_decimal(dst, items.len() as i64);
            for item in items {
                encode(item, dst);
            }
        }
    }
}

fn put_decimal(dst: &mut BytesMut, val: i64) {
    dst.put_slice(val.to_string().as_bytes());
    dst.put_slice(b"\r\n");
}
