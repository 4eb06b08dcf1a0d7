//! Connection handling and lifecycle management.

mod http_connection;

pub use http_connection::HttpConnection;
