//! Progress-tracking request body.
//!
//! The serialized request is handed to reqwest as a stream of fixed-size
//! chunks. Every chunk pulled by the connection advances the
//! [`ProgressReporter`], and a cancelled token ends the stream with an
//! error so the request aborts.

use bytes::Bytes;
use futures::Stream;
use tokio_util::sync::CancellationToken;

use docshare_core::types::ProgressReporter;

/// Wrap a payload into a streaming body that reports progress.
pub fn progress_body(
    payload: Bytes,
    chunk_size: usize,
    progress: ProgressReporter,
    cancel: CancellationToken,
) -> reqwest::Body {
    reqwest::Body::wrap_stream(progress_stream(payload, chunk_size, progress, cancel))
}

/// Split a payload into chunks, advancing `progress` as each one is taken.
pub fn progress_stream(
    payload: Bytes,
    chunk_size: usize,
    progress: ProgressReporter,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let chunk_size = chunk_size.max(1);

    futures::stream::unfold(0usize, move |offset| {
        let payload = payload.clone();
        let progress = progress.clone();
        let cancel = cancel.clone();
        async move {
            let len = payload.len();
            if offset >= len {
                return None;
            }
            if cancel.is_cancelled() {
                let err = std::io::Error::new(std::io::ErrorKind::Interrupted, "upload cancelled");
                return Some((Err(err), len));
            }

            let end = (offset + chunk_size).min(len);
            let chunk = payload.slice(offset..end);
            progress.advance(chunk.len() as u64);
            Some((Ok(chunk), end))
        }
    })
}
