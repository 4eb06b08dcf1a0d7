//! A minimal asynchronous HTTP/1.1 server core
//!
//! This crate speaks directly to raw bidirectional byte streams: it
//! incrementally assembles request messages out of arbitrarily-fragmented
//! reads, streams request bodies with exact length accounting, and streams
//! responses back chunk by chunk. It is built on tokio and the tokio-util
//! codec layer.
//!
//! # Features
//!
//! - Incremental header framing with a hard 8KB size limit
//! - Raw, verbatim header lines with prefix-based field lookup
//! - Pull-based body streaming bounded by `Content-Length`
//! - A body split across the header terminator by the transport is
//!   reassembled transparently
//! - Closed error taxonomy mapping to fixed 413/400 wire responses
//! - One request per connection (no keep-alive, no pipelining, no chunked
//!   transfer encoding)
//!
//! # Example
//!
//! ```no_run
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tokio::net::tcp::OwnedReadHalf;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//! use nano_http::connection::HttpConnection;
//! use nano_http::handler::make_handler;
//! use nano_http::protocol::body::{MemoryBody, ReqBody};
//! use nano_http::protocol::{Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             match connection.process(handler).await {
//!                 Ok(_) => {
//!                     info!("finished process, connection shutdown");
//!                 }
//!                 Err(e) => {
//!                     error!("service has error, cause {}, connection shutdown", e);
//!                 }
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(
//!     request: Request<ReqBody<OwnedReadHalf>>,
//! ) -> Result<Response<MemoryBody>, Infallible> {
//!     info!("request target {:?}", String::from_utf8_lossy(request.head().target()));
//!     Ok(Response::new(200, MemoryBody::from_static(b"Hello world\n")))
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`connection`]: connection lifecycle, from first read to writer shutdown
//! - [`protocol`]: message units, request/response types, bodies, errors
//! - [`codec`]: the incremental framer and the response encoder
//! - [`handler`]: the request handler trait and function adapter
//!
//! # Core components
//!
//! ## Framing
//!
//! [`codec::RequestDecoder`] scans the connection buffer for the header
//! terminator after every read, parses the header block in place, and then
//! streams the body as length-bounded chunks. A terminator that has not
//! arrived yet is not an error; the decoder just asks for more data, one
//! attempt per read event.
//!
//! ## Body streaming
//!
//! Bodies implement [`protocol::body::Body`], a pull interface with a
//! declared total size. The request body producer first drains the bytes
//! that were buffered while framing the header and only then goes back to
//! the socket, so the split between "already buffered" and "still in
//! flight" is invisible to the handler.
//!
//! ## Error handling
//!
//! Errors are closed enums ([`protocol::ParseError`],
//! [`protocol::SendError`], wrapped by [`protocol::HttpError`]), so callers
//! can branch exhaustively. Pre-handler failures map to fixed 413/400
//! responses; failures after the response head is on the wire terminate the
//! connection.
//!
//! # Limitations
//!
//! - HTTP/1.1 style framing only; `Content-Length` is the only supported
//!   body length mechanism (no chunked transfer encoding)
//! - One request per connection; no keep-alive, no pipelining
//! - No TLS (use a reverse proxy for HTTPS)
//! - Maximum header size: 8KB

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
