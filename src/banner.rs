//! Passive banner grabbing for open TCP connections.
//!
//! Reads whatever a service sends unprompted after the handshake. Nothing is
//! ever written to the peer.

use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;
use tracing::trace;

/// Maximum bytes read for a banner.
pub const MAX_BANNER_SIZE: usize = 1024;

/// Perform one read with a deadline and return the trimmed text, if any.
///
/// A timeout, a read error, an immediate close, or an all-whitespace payload
/// all yield `None`. None of them fail the scan.
pub async fn read_banner<S>(stream: &mut S, deadline: Duration) -> Option<String>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = [0u8; MAX_BANNER_SIZE];

    match timeout(deadline, stream.read(&mut buffer)).await {
        Ok(Ok(n)) if n > 0 => normalize_banner(&buffer[..n]),
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            trace!(error = %e, "banner read failed");
            None
        }
        Err(_) => None,
    }
}

/// Decode lossily and strip surrounding whitespace.
fn normalize_banner(data: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(data);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
