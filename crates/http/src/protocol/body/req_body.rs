use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use crate::codec::RequestDecoder;
use crate::protocol::body::Body;
use crate::protocol::{Message, ParseError, PayloadItem, PayloadSize};

/// The request body producer.
///
/// `ReqBody` takes ownership of the connection's framed read half once the
/// header has been decoded. The framed reader's buffer still holds whatever
/// arrived past the header terminator, so body bytes that were read together
/// with the header and body bytes still in flight on the socket come out of
/// the same producer, in order, with no seam.
///
/// Connections serve a single request, so the read half never has to be
/// handed back.
pub struct ReqBody<R> {
    framed: FramedRead<R, RequestDecoder>,
    size: u64,
    eof: bool,
}

impl<R> ReqBody<R>
where
    R: AsyncRead + Unpin,
{
    pub(crate) fn new(framed: FramedRead<R, RequestDecoder>, payload_size: PayloadSize) -> Self {
        Self { framed, size: payload_size.len(), eof: false }
    }
}

#[async_trait]
impl<R> Body for ReqBody<R>
where
    R: AsyncRead + Unpin + Send,
{
    fn size(&self) -> u64 {
        self.size
    }

    async fn pull(&mut self) -> Result<Option<Bytes>, ParseError> {
        if self.eof {
            return Ok(None);
        }

        match self.framed.next().await {
            Some(Ok(Message::Payload(PayloadItem::Chunk(bytes)))) => Ok(Some(bytes)),

            Some(Ok(Message::Payload(PayloadItem::Eof))) => {
                self.eof = true;
                Ok(None)
            }

            Some(Ok(Message::Header(_))) => {
                Err(ParseError::invalid_body("received header while reading body"))
            }

            Some(Err(e)) => Err(e),

            // the decoder reports eof-mid-body itself; this covers a stream
            // that ends without ever entering the decoder again
            None => Err(ParseError::UnexpectedEof),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn framed(input: &[u8]) -> FramedRead<Cursor<Vec<u8>>, RequestDecoder> {
        FramedRead::with_capacity(Cursor::new(input.to_vec()), RequestDecoder::new(), 8 * 1024)
    }

    #[tokio::test]
    async fn empty_body_is_immediately_exhausted() {
        let mut framed = framed(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let message = framed.next().await.unwrap().unwrap();
        let Message::Header((_, payload_size)) = message else {
            panic!("expected header");
        };

        let mut body = ReqBody::new(framed, payload_size);
        assert_eq!(body.size(), 0);
        assert!(body.pull().await.unwrap().is_none());
        // exhausted stays exhausted
        assert!(body.pull().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reads_declared_length_and_stops() {
        let mut framed = framed(b"POST / HTTP/1.1\r\nContent-Length: 4\r\n\r\npingEXTRA");
        let Message::Header((_, payload_size)) = framed.next().await.unwrap().unwrap() else {
            panic!("expected header");
        };

        let mut body = ReqBody::new(framed, payload_size);
        assert_eq!(body.size(), 4);
        assert_eq!(body.pull().await.unwrap().unwrap(), Bytes::from_static(b"ping"));
        assert!(body.pull().await.unwrap().is_none());
        assert!(body.pull().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn short_stream_is_unexpected_eof() {
        let mut framed = framed(b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nping");
        let Message::Header((_, payload_size)) = framed.next().await.unwrap().unwrap() else {
            panic!("expected header");
        };

        let mut body = ReqBody::new(framed, payload_size);
        assert_eq!(body.pull().await.unwrap().unwrap(), Bytes::from_static(b"ping"));

        let err = body.pull().await.unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof), "got {err:?}");
    }
}
