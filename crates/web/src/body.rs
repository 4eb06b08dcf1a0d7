use async_trait::async_trait;
use bytes::Bytes;

use nano_http::protocol::body::{Body, MemoryBody};
use nano_http::protocol::ParseError;

/// The body of a routed response: either a fixed in-memory payload or the
/// inbound request body passed through unchanged (the echo case).
pub enum ResponseBody<B> {
    Memory(MemoryBody),
    Stream(B),
}

impl<B> From<MemoryBody> for ResponseBody<B> {
    fn from(body: MemoryBody) -> Self {
        ResponseBody::Memory(body)
    }
}

#[async_trait]
impl<B> Body for ResponseBody<B>
where
    B: Body,
{
    fn size(&self) -> u64 {
        match self {
            ResponseBody::Memory(body) => body.size(),
            ResponseBody::Stream(body) => body.size(),
        }
    }

    async fn pull(&mut self) -> Result<Option<Bytes>, ParseError> {
        match self {
            ResponseBody::Memory(body) => body.pull().await,
            ResponseBody::Stream(body) => body.pull().await,
        }
    }
}
