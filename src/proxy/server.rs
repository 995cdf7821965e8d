//! Proxy Server
//!
//! Sequential accept loop. Each connection carries one request and is
//! closed once the response is written; a failure only ever closes the
//! connection it happened on.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::cache::{find_subslice, HEADER_TERMINATOR};
use crate::error::{ProxyError, Result};
use crate::proxy::{
    CacheOutcome, OriginFetcher, ProxyPipeline, ProxyRequest, MAX_REQUEST_HEAD_SIZE,
};

// == Serve ==
/// Accepts and fully handles connections one at a time, forever.
///
/// Accept failures are logged and skipped; they never stop the loop.
/// `head_timeout` bounds how long one client may take to send its request
/// head before it is dropped and the next connection is accepted.
pub async fn serve<F: OriginFetcher>(
    listener: TcpListener,
    pipeline: ProxyPipeline<F>,
    head_timeout: Option<Duration>,
) {
    if let Ok(addr) = listener.local_addr() {
        info!("Proxy listening on {}", addr);
    }

    loop {
        let (mut stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };

        match handle_connection(&mut stream, &pipeline, head_timeout).await {
            Ok(outcome) => debug!("Served {} ({:?})", peer, outcome),
            Err(e @ ProxyError::Desynchronized(_)) => {
                error!("Request from {} failed: {}", peer, e)
            }
            Err(e) => warn!("Request from {} abandoned: {}", peer, e),
        }
    }
}

// == Handle Connection ==
/// Reads one request from `stream`, answers it, and shuts the stream down.
///
/// Protocol rejections close without a response. Fetch failures send a
/// short `502 Bad Gateway` first. A head that is still incomplete after
/// `head_timeout` is rejected as `InvalidRequest`.
pub async fn handle_connection<S, F>(
    stream: &mut S,
    pipeline: &ProxyPipeline<F>,
    head_timeout: Option<Duration>,
) -> Result<CacheOutcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: OriginFetcher,
{
    let result = respond(stream, pipeline, head_timeout).await;

    if let Err(e) = &result {
        if let Some(status) = e.client_status() {
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status
            );
            // The client may already be gone
            let _ = stream.write_all(reply.as_bytes()).await;
        }
    }
    let _ = stream.shutdown().await;

    result
}

async fn respond<S, F>(
    stream: &mut S,
    pipeline: &ProxyPipeline<F>,
    head_timeout: Option<Duration>,
) -> Result<CacheOutcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: OriginFetcher,
{
    let head = match head_timeout {
        Some(limit) => tokio::time::timeout(limit, read_request_head(stream))
            .await
            .map_err(|_| {
                ProxyError::InvalidRequest(format!("no complete request head within {:?}", limit))
            })??,
        None => read_request_head(stream).await?,
    };
    let request = ProxyRequest::parse(&head)?;
    debug!("GET {} {}", request.url, request.version);

    let response = pipeline.handle(&request).await?;
    stream.write_all(&response.bytes).await?;
    stream.flush().await?;

    Ok(response.outcome)
}

// == Read Request Head ==
/// Reads until the end of the request headers or EOF.
///
/// # Errors
/// `InvalidRequest` if nothing arrives or the head exceeds
/// `MAX_REQUEST_HEAD_SIZE`.
pub async fn read_request_head<S>(stream: &mut S) -> Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut head = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        // Only the tail can complete a separator split across reads
        let scan_from = head.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
        head.extend_from_slice(&chunk[..n]);

        if find_subslice(&head[scan_from..], HEADER_TERMINATOR).is_some() {
            break;
        }
        if head.len() > MAX_REQUEST_HEAD_SIZE {
            return Err(ProxyError::InvalidRequest(format!(
                "request head exceeds {} bytes",
                MAX_REQUEST_HEAD_SIZE
            )));
        }
    }

    if head.is_empty() {
        return Err(ProxyError::InvalidRequest("empty request".to_string()));
    }
    Ok(head)
}
