use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use nano_http::connection::HttpConnection;

use crate::router::Router;

/// Permits handed out before `accept`; bounds the number of live
/// connections so load cannot grow resource usage without limit.
const DEFAULT_MAX_CONNECTIONS: usize = 1024;

pub struct ServerBuilder {
    router: Router,
    address: Option<Vec<SocketAddr>>,
    max_connections: usize,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: Router::new(), address: None, max_connections: DEFAULT_MAX_CONNECTIONS }
    }

    pub fn bind<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().unwrap().collect::<Vec<_>>());
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Caps the number of concurrently served connections.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?;
        Ok(Server { router: self.router, address, max_connections: self.max_connections })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,
}

/// The accept loop: one task per connection, admission gated through a
/// counting semaphore.
pub struct Server {
    router: Router,
    address: Vec<SocketAddr>,
    max_connections: usize,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub async fn start(self) {
        info!(max_connections = self.max_connections, "start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return;
            }
        };

        self.serve(tcp_listener).await;
    }

    async fn serve(self, tcp_listener: TcpListener) {
        let semaphore = Arc::new(Semaphore::new(self.max_connections));
        let handler = Arc::new(self.router);

        loop {
            // acquire the connection slot before accepting, so a full server
            // stops pulling new connections off the backlog
            let permit = semaphore.clone().acquire_owned().await.expect("semaphore closed");

            let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = handler.clone();

            tokio::spawn(async move {
                // the permit lives exactly as long as the connection task
                let _permit = permit;

                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::new(reader, writer);
                match connection.process(handler).await {
                    Ok(_) => {
                        info!("finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!("service has error, cause {}, connection shutdown", e);
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn spawn_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let server =
            Server { router: Router::new(), address: vec![address], max_connections: 4 };
        tokio::spawn(server.serve(listener));

        address
    }

    async fn roundtrip(address: SocketAddr, request: &[u8]) -> String {
        let mut stream = TcpStream::connect(address).await.unwrap();
        stream.write_all(request).await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    #[tokio::test]
    async fn get_root_returns_the_default_payload() {
        let address = spawn_server().await;

        let response = roundtrip(address, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

        assert!(response.contains("HTTP/1.1 200 OK"), "got {response:?}");
        assert!(response.ends_with("Hello world\n"), "got {response:?}");
    }

    #[tokio::test]
    async fn post_echo_returns_the_body() {
        let address = spawn_server().await;

        let response = roundtrip(
            address,
            b"POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 12\r\n\r\nHello Server",
        )
        .await;

        assert!(response.contains("HTTP/1.1 200 OK"), "got {response:?}");
        assert!(response.ends_with("Hello Server"), "got {response:?}");
    }

    #[tokio::test]
    async fn request_body_split_across_writes() {
        let address = spawn_server().await;

        let mut stream = TcpStream::connect(address).await.unwrap();
        // first write straddles the header terminator by five body bytes
        stream
            .write_all(b"POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 12\r\n\r\nHello")
            .await
            .unwrap();
        stream.flush().await.unwrap();
        stream.write_all(b" Server").await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        let response = String::from_utf8(response).unwrap();

        assert!(response.contains("Content-Length: 12"), "got {response:?}");
        assert!(response.ends_with("Hello Server"), "got {response:?}");
    }

    #[tokio::test]
    async fn connections_serve_a_single_request() {
        let address = spawn_server().await;

        let mut stream = TcpStream::connect(address).await.unwrap();
        stream.write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await.unwrap();

        let mut response = Vec::new();
        // read_to_end only returns once the server hangs up
        stream.read_to_end(&mut response).await.unwrap();
        assert!(!response.is_empty());
    }

    #[test]
    fn build_without_address_fails() {
        let result = Server::builder().build();
        assert!(matches!(result, Err(ServerBuildError::MissingAddress)));
    }
}
