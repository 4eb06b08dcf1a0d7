use std::convert::Infallible;

use async_trait::async_trait;
use bytes::Bytes;

use nano_http::handler::Handler;
use nano_http::protocol::body::{Body, MemoryBody};
use nano_http::protocol::{Request, Response};

use crate::body::ResponseBody;

const SERVER_NAME: &str = "nano-http";

const DEFAULT_PAYLOAD: &[u8] = b"Hello world\n";

/// The built-in dispatch: target `/echo` answers with the inbound body
/// producer unchanged, every other target answers with a fixed in-memory
/// payload.
///
/// Not a general routing table on purpose: URL dispatch is glue around the
/// framing core, not part of it.
pub struct Router {
    default_payload: Bytes,
}

impl Router {
    pub fn new() -> Self {
        Self { default_payload: Bytes::from_static(DEFAULT_PAYLOAD) }
    }

    /// Replaces the payload served for non-echo targets.
    pub fn with_default_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.default_payload = payload.into();
        self
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<B> Handler<B> for Router
where
    B: Body + 'static,
{
    type RespBody = ResponseBody<B>;
    type Error = Infallible;

    async fn call(&self, request: Request<B>) -> Result<Response<Self::RespBody>, Self::Error> {
        let (head, body) = request.into_parts();

        let response_body = match head.target() {
            b"/echo" => ResponseBody::Stream(body),
            _ => ResponseBody::Memory(MemoryBody::new(self.default_payload.clone())),
        };

        Ok(Response::new(200, response_body).with_header("Server", SERVER_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use nano_http::protocol::RequestHeader;

    fn request(method: &[u8], target: &[u8], body: MemoryBody) -> Request<MemoryBody> {
        RequestHeader::new(
            Bytes::copy_from_slice(method),
            Bytes::copy_from_slice(target),
            Bytes::from_static(b"HTTP/1.1"),
            Vec::new(),
        )
        .body(body)
    }

    async fn collect(mut body: impl Body) -> Vec<u8> {
        let mut all = Vec::new();
        while let Some(chunk) = body.pull().await.unwrap() {
            all.extend_from_slice(&chunk);
        }
        all
    }

    #[tokio::test]
    async fn echo_returns_the_inbound_body() {
        let router = Router::new();
        let response =
            router.call(request(b"POST", b"/echo", MemoryBody::from_static(b"ping"))).await.unwrap();

        assert_eq!(response.head().status(), 200);

        let (_, body) = response.into_parts();
        assert_eq!(body.size(), 4);
        assert_eq!(collect(body).await, b"ping");
    }

    #[tokio::test]
    async fn other_targets_get_the_default_payload() {
        let router = Router::new();

        for target in [&b"/"[..], b"/hello", b"/anything/else"] {
            let response =
                router.call(request(b"GET", target, MemoryBody::from_static(b""))).await.unwrap();

            assert_eq!(response.head().status(), 200);

            let (head, body) = response.into_parts();
            assert!(head.header_lines().contains(&"Server: nano-http".to_string()));
            assert_eq!(collect(body).await, b"Hello world\n");
        }
    }

    #[tokio::test]
    async fn custom_default_payload() {
        let router = Router::new().with_default_payload(&b"pong"[..]);
        let response = router.call(request(b"GET", b"/", MemoryBody::from_static(b""))).await.unwrap();

        let (_, body) = response.into_parts();
        assert_eq!(body.size(), 4);
        assert_eq!(collect(body).await, b"pong");
    }
}
