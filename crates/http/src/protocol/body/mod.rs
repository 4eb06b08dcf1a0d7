//! Pull-based body streaming.
//!
//! A body is a stateful producer with a declared total size and a single
//! `pull` operation. Pulling yields chunks until the producer reports
//! end-of-stream with `Ok(None)`; after that every further pull keeps
//! reporting end-of-stream. A producer never yields more bytes in total
//! than its declared size.
//!
//! Two producers live here:
//!
//! - [`ReqBody`]: streams a request body off the connection, starting with
//!   whatever the framer left buffered past the header terminator.
//! - [`MemoryBody`]: a fixed in-memory payload.

use async_trait::async_trait;
use bytes::Bytes;

use crate::protocol::ParseError;

mod memory_body;
mod req_body;

pub use memory_body::MemoryBody;
pub use req_body::ReqBody;

/// A lazy byte producer with a known total length.
#[async_trait]
pub trait Body: Send {
    /// Total number of bytes this body will yield.
    fn size(&self) -> u64;

    /// Pulls the next chunk. `Ok(None)` signals end-of-stream and is sticky:
    /// once returned, all later pulls return it again.
    async fn pull(&mut self) -> Result<Option<Bytes>, ParseError>;
}
