//! TCP connect probing.
//!
//! Completes a full handshake through the operating system's socket API, so no
//! elevated privileges are needed. Refused, unreachable, timed-out, and
//! unresolvable targets all collapse into `Closed`.

use crate::banner::read_banner;
use crate::scanner::traits::{PortProber, ScanResult};
use crate::types::Port;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Result of a single connection attempt.
#[derive(Debug)]
pub enum ConnectionOutcome {
    Open(TcpStream),
    Closed,
}

/// Opens TCP connections with a fixed timeout.
#[derive(Debug, Clone, Copy)]
pub struct Connector {
    timeout: Duration,
}

impl Connector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Attempt one handshake with `target:port`.
    ///
    /// The timeout covers name resolution as well as the handshake. There is
    /// no retry.
    pub async fn attempt(&self, target: &str, port: Port) -> ConnectionOutcome {
        match timeout(self.timeout, TcpStream::connect((target, port.as_u16()))).await {
            Ok(Ok(stream)) => ConnectionOutcome::Open(stream),
            Ok(Err(e)) => {
                trace!(target_host = target, port = port.as_u16(), error = %e, "connect failed");
                ConnectionOutcome::Closed
            }
            Err(_) => {
                trace!(target_host = target, port = port.as_u16(), "connect timed out");
                ConnectionOutcome::Closed
            }
        }
    }
}

/// Probes ports with a TCP connect followed by a passive banner read.
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    connector: Connector,
    timeout: Duration,
}

impl TcpProber {
    /// Create a prober whose connect and banner read share `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            connector: Connector::new(timeout),
            timeout,
        }
    }
}

#[async_trait]
impl PortProber for TcpProber {
    async fn probe(&self, target: &str, port: Port) -> ScanResult {
        match self.connector.attempt(target, port).await {
            ConnectionOutcome::Open(mut stream) => {
                let banner = read_banner(&mut stream, self.timeout).await;
                drop(stream);
                ScanResult::open(target, port, banner)
            }
            ConnectionOutcome::Closed => ScanResult::closed(target, port),
        }
    }
}
