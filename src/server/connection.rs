use crate::{
    errors::{ParseError, ServeError},
    limits::ConnLimits,
    Request, Response, Router, StatusCode,
};
use std::{future::Future, io, time::Duration};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::timeout,
};
use tracing::debug;

/// Serves exactly one request on `stream`, then closes it.
///
/// One `read` call fills a buffer of
/// [`max_request_size`](ConnLimits::max_request_size)` + 1` bytes and the
/// parser receives exactly the bytes that read returned. There is no read loop:
/// a request split across several segments is parsed from the first one only.
///
/// On a parse failure nothing is written unless
/// [`reply_bad_request`](ConnLimits::reply_bad_request) is set; the error is
/// returned either way. The stream is shut down after a successful write and
/// dropped in every case.
pub async fn serve<S>(mut stream: S, router: &Router, limits: &ConnLimits) -> Result<(), ServeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buffer = vec![0; limits.buffer_size()];
    let len = with_deadline(limits.socket_read_timeout, stream.read(&mut buffer)).await?;

    let request = match parse(&buffer[..len], limits) {
        Ok(request) => request,
        Err(err) => {
            if limits.reply_bad_request {
                let mut response = Response::new();
                response
                    .text_body(StatusCode::BAD_REQUEST.reason())
                    .set_status(StatusCode::BAD_REQUEST);
                write_response(&mut stream, &response, limits).await?;
            }
            return Err(err.into());
        }
    };

    let mut response = Response::new();
    router.resolve(&request, &mut response);

    write_response(&mut stream, &response, limits).await
}

#[inline]
fn parse(raw: &[u8], limits: &ConnLimits) -> Result<Request, ParseError> {
    if raw.len() > limits.max_request_size {
        return Err(ParseError::RequestTooLarge {
            limit: limits.max_request_size,
        });
    }

    Request::parse(raw)
}

async fn write_response<S>(
    stream: &mut S,
    response: &Response,
    limits: &ConnLimits,
) -> Result<(), ServeError>
where
    S: AsyncWrite + Unpin,
{
    with_deadline(limits.socket_write_timeout, stream.write_all(&response.render())).await?;

    if let Err(err) = stream.shutdown().await {
        debug!(%err, "shutdown after write failed");
    }

    Ok(())
}

#[inline]
async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> Result<T, ServeError>
where
    F: Future<Output = io::Result<T>>,
{
    let result = match deadline {
        Some(time) => timeout(time, fut).await.map_err(|_| ServeError::Timeout)?,
        None => fut.await,
    };

    result.map_err(ServeError::from)
}
