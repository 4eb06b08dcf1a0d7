use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, info, warn};

use crate::codec::header::MAX_HEADER_BYTES;
use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::body::{Body, MemoryBody, ReqBody};
use crate::protocol::{HttpError, Message, ParseError, PayloadItem, PayloadSize, Response, SendError};

/// Fixed response for a header block that outgrew the size limit. Written
/// raw, bypassing the encoder: the reason table deliberately doesn't know
/// 413.
const RESPONSE_HEADER_TOO_LARGE: &[u8] =
    b"HTTP/1.1 413 Request Entity Too Large\r\nContent-Length: 24\r\n\r\nRequest Entity Too Large";

/// Fixed response for every other pre-handler failure.
const RESPONSE_BAD_REQUEST: &[u8] = b"HTTP/1.1 400 Bad Request\r\nContent-Length: 11\r\n\r\nBad Request";

/// An HTTP connection serving a single request.
///
/// `HttpConnection` owns both framed halves of the stream and manages the
/// full lifecycle: decoding the request, handing the read half over to the
/// request body producer, invoking the handler, and streaming the response
/// back chunk by chunk. There is no keep-alive: after one request the
/// writer is shut down and the connection ends.
///
/// # Type Parameters
///
/// * `R`: the async readable half
/// * `W`: the async writable half
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), MAX_HEADER_BYTES),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    /// Serves the connection's single request.
    ///
    /// Framing and header errors arrive here before the handler runs and
    /// get a best-effort fixed error response. Errors after the response
    /// head has been written can only terminate the connection.
    pub async fn process<H>(self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<ReqBody<R>>,
        H::RespBody: Body,
    {
        let HttpConnection { mut framed_read, mut framed_write } = self;

        match framed_read.next().await {
            Some(Ok(Message::Header((header, payload_size)))) => {
                let request = header.body(ReqBody::new(framed_read, payload_size));

                match handler.call(request).await {
                    Ok(response) => send_response(&mut framed_write, response).await?,
                    Err(e) => {
                        error!("handle response error, cause: {}", e.into());
                        send_response(&mut framed_write, internal_error_response()).await?;
                    }
                }

                framed_write.get_mut().shutdown().await.map_err(SendError::io)?;
                info!("finished process, connection shutdown");
                Ok(())
            }

            Some(Ok(Message::Payload(_))) => {
                // the decoder can't produce payload before a header
                let e = ParseError::invalid_body("received body while expecting header");
                send_error_response(&mut framed_write, &e).await;
                Err(e.into())
            }

            Some(Err(e)) => {
                error!("can't receive request, cause {}", e);
                send_error_response(&mut framed_write, &e).await;
                Err(e.into())
            }

            None => {
                info!("peer closed before sending a request");
                Ok(())
            }
        }
    }
}

/// Streams a response: head first, then every pulled chunk immediately, so
/// the body is never buffered as a whole.
async fn send_response<W, B>(
    framed_write: &mut FramedWrite<W, ResponseEncoder>,
    response: Response<B>,
) -> Result<(), HttpError>
where
    W: AsyncWrite + Unpin,
    B: Body,
{
    let (head, mut body) = response.into_parts();
    let payload_size = PayloadSize::from(body.size());

    framed_write.send(Message::Header((head, payload_size))).await?;

    loop {
        match body.pull().await {
            Ok(Some(bytes)) => {
                framed_write.send(Message::Payload(PayloadItem::Chunk(bytes))).await?;
            }
            Ok(None) => {
                framed_write.send(Message::Payload(PayloadItem::Eof)).await?;
                return Ok(());
            }
            // the head is already on the wire; all that's left is to hang up
            Err(e) => return Err(e.into()),
        }
    }
}

/// Best-effort fixed error response, written raw to the underlying writer.
/// Failure to deliver it is logged and otherwise ignored: the connection is
/// about to be torn down for the original error anyway.
async fn send_error_response<W>(framed_write: &mut FramedWrite<W, ResponseEncoder>, error: &ParseError)
where
    W: AsyncWrite + Unpin,
{
    let raw = match error {
        ParseError::TooLargeHeader { .. } => RESPONSE_HEADER_TOO_LARGE,
        _ => RESPONSE_BAD_REQUEST,
    };

    let writer = framed_write.get_mut();
    let result = async {
        writer.write_all(raw).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = result {
        warn!("can't send error response, cause {}", e);
    }
}

fn internal_error_response() -> Response<MemoryBody> {
    Response::new(500, MemoryBody::from_static(b""))
}
