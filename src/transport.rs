//! Datagram transport for the assistant protocol
//!
//! [`AssistTransport`] is the seam between the session driver and the
//! network. [`UdpTransport`] is the production implementation: one connected
//! UDP socket owned for the whole session and released when dropped.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, warn};

use crate::error::{AssistError, AssistResult};

/// Transport statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Datagrams written
    pub requests_sent: u64,
    /// Datagrams read
    pub responses_received: u64,
    /// Failed sends or receives
    pub errors: u64,
    /// Payload bytes written
    pub bytes_sent: u64,
    /// Payload bytes read
    pub bytes_received: u64,
}

/// Transport layer abstraction for the assistant protocol.
///
/// Implementations move whole datagrams: `send` writes one message, `recv`
/// reads one message into the caller's buffer. Deadlines are applied by the
/// caller.
pub trait AssistTransport: Send {
    /// Write one datagram, returning the number of bytes written.
    ///
    /// A count short of `data.len()` is reported as written; the exchange
    /// layer turns it into a transport error.
    fn send(&mut self, data: &[u8]) -> impl Future<Output = AssistResult<usize>> + Send;

    /// Read one datagram into `buf`, returning its length.
    fn recv(&mut self, buf: &mut [u8]) -> impl Future<Output = AssistResult<usize>> + Send;

    /// Get transport statistics
    fn get_stats(&self) -> TransportStats;

    /// Release the underlying socket
    fn close(&mut self) -> impl Future<Output = AssistResult<()>> + Send;
}

/// UDP transport connected to a logger's assistant endpoint
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    local: SocketAddr,
    remote: SocketAddr,
    stats: TransportStats,
}

impl UdpTransport {
    /// Bind `local` (or an ephemeral address of the remote's family) and
    /// connect to `remote`.
    pub async fn connect(local: Option<SocketAddr>, remote: SocketAddr) -> AssistResult<Self> {
        let bind_addr = local.unwrap_or_else(|| unspecified_for(&remote));
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| AssistError::transport(format!("Failed to bind {}: {}", bind_addr, e)))?;
        socket
            .connect(remote)
            .await
            .map_err(|e| AssistError::transport(format!("Failed to connect {}: {}", remote, e)))?;
        let local = socket.local_addr()?;

        debug!("UDP socket {} connected to {}", local, remote);

        Ok(Self {
            socket: Some(socket),
            local,
            remote,
            stats: TransportStats::default(),
        })
    }

    /// Local address of the socket
    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// Remote assistant endpoint
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    fn socket(&self) -> AssistResult<&UdpSocket> {
        self.socket
            .as_ref()
            .ok_or_else(|| AssistError::transport("Socket already closed"))
    }
}

impl AssistTransport for UdpTransport {
    async fn send(&mut self, data: &[u8]) -> AssistResult<usize> {
        let result = self.socket()?.send(data).await;
        match result {
            Ok(n) => {
                self.stats.requests_sent += 1;
                self.stats.bytes_sent += n as u64;
                Ok(n)
            }
            Err(e) => {
                self.stats.errors += 1;
                warn!("Send to {} failed: {}", self.remote, e);
                Err(e.into())
            }
        }
    }

    async fn recv(&mut self, buf: &mut [u8]) -> AssistResult<usize> {
        let result = self.socket()?.recv(buf).await;
        match result {
            Ok(n) => {
                self.stats.responses_received += 1;
                self.stats.bytes_received += n as u64;
                Ok(n)
            }
            Err(e) => {
                self.stats.errors += 1;
                warn!("Receive from {} failed: {}", self.remote, e);
                Err(e.into())
            }
        }
    }

    fn get_stats(&self) -> TransportStats {
        self.stats
    }

    async fn close(&mut self) -> AssistResult<()> {
        if self.socket.take().is_some() {
            debug!("UDP socket {} closed", self.local);
        }
        Ok(())
    }
}

fn unspecified_for(remote: &SocketAddr) -> SocketAddr {
    match remote {
        SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    }
}

/// Resolve `addr` to a socket address.
///
/// Accepts `host:port`, `ip:port`, a bare IP or a bare host name; the last two
/// get `default_port`. IPv4 results are preferred since the loggers only
/// speak IPv4.
pub async fn resolve_endpoint(addr: &str, default_port: u16) -> AssistResult<SocketAddr> {
    if let Ok(sock) = addr.parse::<SocketAddr>() {
        return Ok(sock);
    }
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }

    let query = if addr.contains(':') {
        addr.to_string()
    } else {
        format!("{}:{}", addr, default_port)
    };

    let candidates: Vec<SocketAddr> = lookup_host(query.as_str())
        .await
        .map_err(|e| AssistError::address_resolution(addr, e.to_string()))?
        .collect();

    candidates
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(|| AssistError::address_resolution(addr, "no addresses found"))
}
