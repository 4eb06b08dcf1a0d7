//! Protocol encoding/decoding implementation.
//!
//! The codec layer plugs into `tokio_util`'s framed I/O: [`RequestDecoder`]
//! drives the inbound side (framing, header parsing, body chunking) and
//! [`ResponseEncoder`] the outbound side (head serialization, length-bounded
//! body writing).

mod request_decoder;
mod response_encoder;

pub mod body;
pub mod header;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
