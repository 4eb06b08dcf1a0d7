//! HTTP request decoder.
//!
//! Turns the unbounded sequence of partial socket reads buffered by the
//! framed reader into well-formed message units: first the parsed header,
//! then body chunks, then end-of-stream. The decoder is driven once per
//! read event; "not enough data yet" is simply `Ok(None)` and the framed
//! reader goes back to the socket for more.

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::codec::body::PayloadDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{Message, ParseError, PayloadItem, PayloadSize, RequestHeader};

/// A decoder for HTTP requests that handles both the header and the payload.
///
/// # State machine
///
/// The decoder's state is the `payload_decoder` field:
/// - `None`: currently framing and parsing the header
/// - `Some(PayloadDecoder)`: currently streaming the payload
///
/// The payload decoder is installed from the [`PayloadSize`] the header
/// parse produced and uninstalled once it reports end-of-stream.
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
    payload_decoder: Option<PayloadDecoder>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { header_decoder: HeaderDecoder, payload_decoder: None }
    }
}

impl Decoder for RequestDecoder {
    type Item = Message<(RequestHeader, PayloadSize)>;
    type Error = ParseError;

    /// Attempts to decode the next message unit from the buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: decoded the request header
    /// - `Ok(Some(Message::Payload(_)))`: decoded a body chunk or EOF
    /// - `Ok(None)`: need more data
    /// - `Err(_)`: the request is broken; the connection is done for
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // stream payload if a payload decoder is installed
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let message = match payload_decoder.decode(src)? {
                Some(item @ PayloadItem::Chunk(_)) => Some(Message::Payload(item)),
                Some(item @ PayloadItem::Eof) => {
                    // this request's body is complete
                    self.payload_decoder.take();
                    Some(Message::Payload(item))
                }
                None => None,
            };

            return Ok(message);
        }

        // frame and parse the header
        let message = match self.header_decoder.decode(src)? {
            Some((header, payload_size)) => {
                self.payload_decoder = Some(payload_size.into());
                Some(Message::Header((header, payload_size)))
            }
            None => None,
        };

        Ok(message)
    }

    /// Called when the underlying stream hit EOF.
    ///
    /// EOF while a payload decoder is still installed means the peer closed
    /// the socket before delivering the declared body length. EOF during the
    /// header phase ends the stream silently; the connection layer treats a
    /// close before any request as a normal hangup.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(item) => Ok(Some(item)),
            None if self.payload_decoder.is_some() => Err(ParseError::UnexpectedEof),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_then_body_then_eof() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"POST /echo HTTP/1.1\r\nContent-Length: 4\r\n\r\nping"[..]);

        let header = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(header.is_header());

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&chunk.into_payload_item().unwrap().into_bytes().unwrap()[..], b"ping");

        let eof = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(eof.into_payload_item().unwrap().is_eof());
    }

    #[test]
    fn body_split_across_reads_straddling_the_terminator() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::new();

        // first read delivers the header plus the first 5 body bytes
        buffer.extend_from_slice(b"POST /echo HTTP/1.1\r\nContent-Length: 12\r\n\r\nHello");

        let Message::Header((header, payload_size)) = decoder.decode(&mut buffer).unwrap().unwrap() else {
            panic!("expected header");
        };
        assert_eq!(header.target(), b"/echo");
        assert_eq!(payload_size, PayloadSize::Length(12));

        let first = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&first.into_payload_item().unwrap().into_bytes().unwrap()[..], b"Hello");

        // nothing more buffered yet
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        // second read delivers the remaining 7 bytes
        buffer.extend_from_slice(b" Server");
        let second = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&second.into_payload_item().unwrap().into_bytes().unwrap()[..], b" Server");

        let eof = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(eof.into_payload_item().unwrap().is_eof());
    }

    #[test]
    fn incomplete_header_is_retried_across_reads() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"GET /hello HT"[..]);

        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"TP/1.1\r\nHost: localhost\r\n\r\n");
        let header = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(header.is_header());
    }

    #[test]
    fn get_request_body_is_immediately_eof() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n"[..]);

        let Message::Header((_, payload_size)) = decoder.decode(&mut buffer).unwrap().unwrap() else {
            panic!("expected header");
        };
        assert!(payload_size.is_empty());

        let eof = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(eof.into_payload_item().unwrap().is_eof());
    }

    #[test]
    fn eof_mid_body_is_an_error() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nping"[..]);

        decoder.decode(&mut buffer).unwrap().unwrap();
        decoder.decode(&mut buffer).unwrap().unwrap();

        let err = decoder.decode_eof(&mut buffer).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof), "got {err:?}");
    }

    #[test]
    fn eof_during_header_phase_ends_the_stream() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"GET /hello HT"[..]);

        assert!(decoder.decode_eof(&mut buffer).unwrap().is_none());
    }
}
