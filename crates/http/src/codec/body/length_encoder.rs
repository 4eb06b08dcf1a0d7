use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::warn;

use crate::protocol::{PayloadItem, SendError};

/// Encoder for response bodies with a declared length.
///
/// Chunks are copied through verbatim, clamped so the total never exceeds
/// the `Content-Length` that went out with the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    remaining: u64,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { remaining: length }
    }

    pub fn is_finish(&self) -> bool {
        self.remaining == 0
    }
}

impl Encoder<PayloadItem> for LengthEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let PayloadItem::Chunk(bytes) = item else {
            return Ok(());
        };

        if bytes.is_empty() {
            return Ok(());
        }

        if self.remaining == 0 {
            warn!(extra = bytes.len(), "encode payload_item but no need to encode anymore");
            return Ok(());
        }

        let len = u64::min(bytes.len() as u64, self.remaining) as usize;
        dst.extend_from_slice(&bytes[..len]);
        self.remaining -= len as u64;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn writes_chunks_until_declared_length() {
        let mut encoder = LengthEncoder::new(12);
        let mut dst = BytesMut::new();

        encoder.encode(PayloadItem::Chunk(Bytes::from_static(b"Hello")), &mut dst).unwrap();
        assert!(!encoder.is_finish());

        encoder.encode(PayloadItem::Chunk(Bytes::from_static(b" Server")), &mut dst).unwrap();
        assert!(encoder.is_finish());

        encoder.encode(PayloadItem::Eof, &mut dst).unwrap();
        assert_eq!(&dst[..], b"Hello Server");
    }

    #[test]
    fn excess_bytes_are_clamped() {
        let mut encoder = LengthEncoder::new(4);
        let mut dst = BytesMut::new();

        encoder.encode(PayloadItem::Chunk(Bytes::from_static(b"pingpong")), &mut dst).unwrap();

        assert!(encoder.is_finish());
        assert_eq!(&dst[..], b"ping");
    }
}
