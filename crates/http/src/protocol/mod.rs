//! Core protocol abstractions.
//!
//! - **Message handling** ([`message`]): [`Message`], [`PayloadItem`] and
//!   [`PayloadSize`], the units flowing between the codecs and the
//!   connection layer.
//! - **Request side** ([`request`]): [`RequestHeader`] with raw header
//!   lines and prefix field lookup, plus [`Request`].
//! - **Response side** ([`response`]): [`ResponseHead`], [`Response`] and
//!   the fixed reason-phrase table.
//! - **Body streaming** ([`body`]): the pull-based [`body::Body`] trait and
//!   its producers.
//! - **Errors** ([`HttpError`], [`ParseError`], [`SendError`]): closed
//!   enums, so callers can branch exhaustively on the failure kind.

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod request;
pub use request::Request;
pub use request::RequestHeader;

mod response;
pub use response::reason_phrase;
pub use response::Response;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

pub mod body;
