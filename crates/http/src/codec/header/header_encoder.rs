//! HTTP header encoder: serializes a response head into raw bytes.
//!
//! The status line carries a reason phrase from the fixed table in
//! [`crate::protocol::reason_phrase`]; handler-supplied header lines are
//! written verbatim; `Content-Length` is always computed from the body's
//! declared size, never taken from the handler.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{reason_phrase, PayloadSize, ResponseHead, SendError};

/// Initial buffer size reserved for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for HTTP response heads implementing the [`Encoder`] trait.
pub struct HeaderEncoder;

impl Encoder<(ResponseHead, PayloadSize)> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, item: (ResponseHead, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (head, payload_size) = item;

        dst.reserve(INIT_HEADER_SIZE);

        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", head.status(), reason_phrase(head.status()))?;

        for line in head.header_lines() {
            dst.put_slice(line.as_bytes());
            dst.put_slice(b"\r\n");
        }

        write!(FastWrite(dst), "Content-Length: {}\r\n", payload_size.len())?;
        dst.put_slice(b"\r\n");

        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Space is reserved up front, so writes go straight into the buffer.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
