//! The thin shell around the `nano-http` core: a TCP accept loop with
//! bounded admission, plus the built-in echo/fixed-payload dispatch.
//!
//! # Example
//!
//! ```no_run
//! use nano_web::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     Server::builder()
//!         .bind("127.0.0.1:8080")
//!         .build()
//!         .unwrap()
//!         .start()
//!         .await;
//! }
//! ```

mod body;
mod router;
mod server;

pub use body::ResponseBody;
pub use router::Router;
pub use server::{Server, ServerBuildError, ServerBuilder};
