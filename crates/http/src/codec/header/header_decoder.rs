//! HTTP header decoder: the incremental framer and header model.
//!
//! The decoder scans the connection buffer for the `\r\n\r\n` terminator.
//! Until the terminator shows up the decoder reports "no item yet" and the
//! framed reader appends the next socket read to the buffer: one extraction
//! attempt per read event, never a spin. Once found, the header block is
//! split off and parsed in place; everything after the terminator stays in
//! the buffer for the body phase.
//!
//! # Parsing model
//!
//! Header lines are kept verbatim rather than being normalized into a typed
//! map. Two documented quirks of the wire contract are preserved on purpose:
//!
//! - A request line with more than three tokens is not rejected; the extra
//!   tokens fold into the version field.
//! - Field lookup is a case-sensitive prefix match over the raw lines
//!   (see [`RequestHeader::field_get`]).
//!
//! # Limits
//!
//! - Maximum header block size: 8KB. A buffer that reaches the limit with
//!   no terminator in sight fails the connection with `TooLargeHeader`.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, RequestHeader};

/// Maximum size in bytes allowed for the entire header block
pub(crate) const MAX_HEADER_BYTES: usize = 8 * 1024;

/// The header block terminator
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

const CONTENT_LENGTH: &str = "Content-Length";
const TRANSFER_ENCODING: &str = "Transfer-Encoding";

/// Decoder for HTTP request headers implementing the [`Decoder`] trait.
///
/// Yields the parsed [`RequestHeader`] together with the [`PayloadSize`]
/// derived from it, which tells the request decoder how to stream the body.
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = (RequestHeader, PayloadSize);
    type Error = ParseError;

    /// Attempts to extract and parse a complete header block from `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((header, payload_size)))` if a complete header was parsed
    /// - `Ok(None)` if the terminator has not arrived yet (read more)
    /// - `Err(ParseError)` if the block is oversized or does not parse
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let index = match find_terminator(src) {
            Some(index) => index,
            None => {
                ensure!(src.len() < MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };

        // the block includes the terminator; the rest of the buffer belongs
        // to the body phase
        let block = src.split_to(index + HEADER_TERMINATOR.len()).freeze();
        trace!(header_size = block.len(), "framed header block");

        let header = parse_header_block(&block)?;
        let payload_size = parse_payload(&header)?;

        Ok(Some((header, payload_size)))
    }
}

fn find_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len()).position(|window| window == HEADER_TERMINATOR)
}

/// Parses a framed header block into a [`RequestHeader`].
///
/// The first CRLF-delimited line is the request line; every following
/// non-empty line is kept raw. Parse failure of the request line is the only
/// way this can fail.
fn parse_header_block(block: &Bytes) -> Result<RequestHeader, ParseError> {
    let lines = split_lines(block);

    let (request_line, rest) = lines
        .split_first()
        .ok_or_else(|| ParseError::malformed_request("header block has no request line"))?;

    let (method, target, version) = parse_request_line(request_line)?;

    let header_lines = rest.iter().filter(|line| !line.is_empty()).cloned().collect();

    Ok(RequestHeader::new(method, target, version, header_lines))
}

/// Splits `block` into its CRLF-delimited lines, terminators stripped.
fn split_lines(block: &Bytes) -> Vec<Bytes> {
    let mut lines = Vec::new();
    let mut offset = 0;

    while let Some(pos) = block[offset..].windows(2).position(|window| window == b"\r\n") {
        lines.push(block.slice(offset..offset + pos));
        offset += pos + 2;
    }

    lines
}

/// Parses a request line into its method, target and version fields.
///
/// The line is trimmed and split on single spaces into at most three
/// fields, so anything after the second space (extra tokens included)
/// becomes the version field. Fewer than three fields is a malformed
/// request.
fn parse_request_line(line: &Bytes) -> Result<(Bytes, Bytes, Bytes), ParseError> {
    let trimmed = line.trim_ascii();

    let mut parts = trimmed.splitn(3, |b| *b == b' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version)) => Ok((
            Bytes::copy_from_slice(method),
            Bytes::copy_from_slice(target),
            Bytes::copy_from_slice(version),
        )),
        _ => Err(ParseError::malformed_request(format!(
            "request line {:?} has fewer than 3 tokens",
            String::from_utf8_lossy(line)
        ))),
    }
}

/// Determines the payload size for a parsed request.
///
/// `Content-Length` is the only supported length-determination mechanism;
/// chunked transfer encoding and bodies of unknown length are rejected.
/// GET and HEAD may not carry a body, and with neither a declared length
/// nor chunked encoding present their body length is forced to zero.
fn parse_payload(header: &RequestHeader) -> Result<PayloadSize, ParseError> {
    let declared = match header.field_get(CONTENT_LENGTH) {
        None => None,
        Some(raw) => {
            let text = std::str::from_utf8(raw)
                .map_err(|_| ParseError::invalid_content_length("value is not valid utf-8"))?;
            let value = text
                .parse::<i64>()
                .map_err(|_| ParseError::invalid_content_length(format!("value {text:?} is not an integer")))?;
            ensure!(value >= 0, ParseError::invalid_content_length(format!("value {value} is negative")));
            Some(value as u64)
        }
    };

    let is_chunked = header.field_get(TRANSFER_ENCODING).is_some_and(|value| value == b"chunked");

    if !header.body_allowed() {
        ensure!(
            declared.unwrap_or(0) == 0 && !is_chunked,
            ParseError::body_not_allowed(header.method())
        );
        return Ok(PayloadSize::Empty);
    }

    match declared {
        Some(length) => Ok(PayloadSize::from(length)),
        None if is_chunked => Err(ParseError::unsupported_encoding("chunked transfer encoding")),
        None => Err(ParseError::unsupported_encoding("body length is unknown")),
    }
}
