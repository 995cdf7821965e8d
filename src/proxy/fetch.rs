//! Origin Fetch
//!
//! Retrieves a complete response from the origin server on a cache miss.
//! Responses of any length are read into a buffer that doubles whenever it
//! fills; a failed allocation fails the fetch instead of aborting.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tracing::debug;

use crate::error::{ProxyError, Result};
use crate::proxy::{OriginTarget, INITIAL_READ_BUFFER};

// == Origin Fetcher ==
/// Source of raw origin responses.
///
/// The result is all or nothing: either the full response bytes or an error,
/// never a partial body.
pub trait OriginFetcher: Send + Sync {
    fn fetch(&self, target: &OriginTarget) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

// == TCP Origin Fetcher ==
/// Fetches over a fresh TCP connection per request.
#[derive(Debug, Clone, Default)]
pub struct TcpOriginFetcher {
    /// Upper bound on resolve + connect + exchange, None = unbounded
    timeout: Option<Duration>,
}

impl TcpOriginFetcher {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    async fn exchange(&self, target: &OriginTarget) -> Result<Vec<u8>> {
        let addr = lookup_host((target.host.as_str(), target.port))
            .await
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ProxyError::Resolve(target.host.clone()))?;

        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ProxyError::Connect(target.authority(), e))?;
        debug!("Connected to origin {} ({})", target.authority(), addr);

        stream
            .write_all(target.origin_request().as_bytes())
            .await
            .map_err(ProxyError::Fetch)?;

        let response = read_growable(&mut stream, INITIAL_READ_BUFFER).await?;
        if response.is_empty() {
            return Err(ProxyError::EmptyResponse(target.authority()));
        }

        debug!(
            "Read {} bytes from origin {}",
            response.len(),
            target.authority()
        );
        Ok(response)
    }
}

impl OriginFetcher for TcpOriginFetcher {
    async fn fetch(&self, target: &OriginTarget) -> Result<Vec<u8>> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(target))
                .await
                .map_err(|_| ProxyError::Timeout(target.authority()))?,
            None => self.exchange(target).await,
        }
    }
}

// == Read Growable ==
/// Reads `reader` to EOF into a buffer that starts at `initial_capacity`
/// bytes and doubles each time it fills.
///
/// # Errors
/// - `BufferExhausted` if the buffer cannot grow
/// - `Fetch` on any read error; bytes read so far are discarded
pub async fn read_growable<R>(reader: &mut R, initial_capacity: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    grow(&mut buffer, initial_capacity.max(1))?;
    let mut filled = 0;

    loop {
        if filled == buffer.len() {
            let additional = buffer.len();
            grow(&mut buffer, additional)?;
        }

        let n = reader
            .read(&mut buffer[filled..])
            .await
            .map_err(ProxyError::Fetch)?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    buffer.truncate(filled);
    Ok(buffer)
}

fn grow(buffer: &mut Vec<u8>, additional: usize) -> Result<()> {
    buffer
        .try_reserve_exact(additional)
        .map_err(|_| ProxyError::BufferExhausted(buffer.len()))?;
    buffer.resize(buffer.len() + additional, 0);
    Ok(())
}
