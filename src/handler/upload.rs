//! PUT upload handler
//!
//! Streams the request body into the translated path, creating parent
//! directories on demand and truncating any existing file. The write is not
//! atomic: a fault mid-body leaves whatever was already written on disk.

use crate::config::AppState;
use crate::error::{BoxError, UploadError};
use crate::http;
use crate::logger;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes, Frame};
use hyper::header::CONTENT_LENGTH;
use hyper::{HeaderMap, Request, Response};
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Store the request body at the translated request path
pub async fn handle_put<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, UploadError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    let content_length = declared_length(req.headers())?;

    if let Some(limit) = state.config.storage.max_upload_size {
        if content_length > limit {
            logger::log_warning(&format!(
                "Upload rejected: {content_length} bytes exceeds limit of {limit} bytes ({})",
                req.uri().path()
            ));
            return Ok(http::build_413_response());
        }
    }

    let target = http::translate_path(&state.document_root, req.uri().path());
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&target).await?;
    let written = copy_body(
        req.into_body(),
        &mut file,
        content_length,
        state.read_timeout(),
    )
    .await?;
    file.flush().await?;
    drop(file);

    logger::log_upload_stored(&target, written);
    Ok(http::build_upload_response())
}

/// Parse the declared body length
pub fn declared_length(headers: &HeaderMap) -> Result<u64, UploadError> {
    let value = headers
        .get(CONTENT_LENGTH)
        .ok_or(UploadError::MissingContentLength)?;
    let text = value.to_str().map_err(|_| {
        UploadError::InvalidContentLength(String::from_utf8_lossy(value.as_bytes()).into_owned())
    })?;
    text.trim()
        .parse::<u64>()
        .map_err(|_| UploadError::InvalidContentLength(text.to_string()))
}

/// Copy exactly `expected` bytes from `body` into `sink`
///
/// Data past the declared length is discarded. Returns the number of bytes
/// written, which always equals `expected` on success.
pub async fn copy_body<B, W>(
    mut body: B,
    sink: &mut W,
    expected: u64,
    read_timeout: Option<Duration>,
) -> Result<u64, UploadError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
    W: AsyncWrite + Unpin,
{
    let mut received: u64 = 0;

    while received < expected {
        let Some(frame) = next_frame(&mut body, read_timeout, received, expected).await? else {
            break;
        };
        let Ok(data) = frame.into_data() else {
            // trailers
            continue;
        };

        let remaining = expected - received;
        let take = usize::try_from(remaining).map_or(data.len(), |r| r.min(data.len()));
        sink.write_all(&data[..take]).await?;
        received += take as u64;
    }

    if received < expected {
        return Err(UploadError::Truncated { received, expected });
    }
    Ok(received)
}

async fn next_frame<B>(
    body: &mut B,
    read_timeout: Option<Duration>,
    received: u64,
    expected: u64,
) -> Result<Option<Frame<Bytes>>, UploadError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    let frame = match read_timeout {
        Some(limit) => tokio::time::timeout(limit, body.frame())
            .await
            .map_err(|_| UploadError::ReadTimeout { received, expected })?,
        None => body.frame().await,
    };

    frame
        .transpose()
        .map_err(|e| UploadError::Body(e.into()))
}
