use async_trait::async_trait;
use bytes::Bytes;

use crate::protocol::body::Body;
use crate::protocol::ParseError;

/// A fixed in-memory body with a trivially known length.
///
/// The whole payload is yielded by the first pull; the second pull reports
/// end-of-stream.
pub struct MemoryBody {
    data: Bytes,
    done: bool,
}

impl MemoryBody {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into(), done: false }
    }

    pub fn from_static(data: &'static [u8]) -> Self {
        Self { data: Bytes::from_static(data), done: false }
    }
}

#[async_trait]
impl Body for MemoryBody {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn pull(&mut self) -> Result<Option<Bytes>, ParseError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;
        Ok(Some(self.data.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_everything_once() {
        let mut body = MemoryBody::from_static(b"Hello, World!");
        assert_eq!(body.size(), 13);

        let chunk = body.pull().await.unwrap().unwrap();
        assert_eq!(&chunk[..], b"Hello, World!");

        assert!(body.pull().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_body_reports_eof_first() {
        let mut body = MemoryBody::from_static(b"");
        assert_eq!(body.size(), 0);
        // an empty payload still takes one pull to report end-of-stream
        assert_eq!(body.pull().await.unwrap(), Some(Bytes::new()));
        assert!(body.pull().await.unwrap().is_none());
    }
}
