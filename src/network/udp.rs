//! UDP socket setup
//!
//! VBAN runs over UDP/IPv4. The socket is bound to an ephemeral local port
//! and connected to the mixer so every request goes out with a plain `send`.

use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;

use crate::config::Connection;
use crate::error::NetworkError;

/// Something that writes whole datagrams to an already chosen peer
pub trait Datagram {
    fn send_datagram<'a>(
        &'a self,
        buf: &'a [u8],
    ) -> impl Future<Output = io::Result<usize>> + Send + 'a;
}

impl Datagram for UdpSocket {
    fn send_datagram<'a>(
        &'a self,
        buf: &'a [u8],
    ) -> impl Future<Output = io::Result<usize>> + Send + 'a {
        self.send(buf)
    }
}

/// Resolve the first IPv4 address for `conn`
pub async fn resolve_ipv4(conn: &Connection) -> Result<SocketAddr, NetworkError> {
    let addr = conn.address();
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr)
        .await
        .map_err(|e| NetworkError::ResolveFailed {
            addr: addr.clone(),
            reason: e.to_string(),
        })?
        .collect();

    addrs
        .into_iter()
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| NetworkError::ResolveFailed {
            addr,
            reason: "no IPv4 address".to_string(),
        })
}

/// Open a UDP socket connected to the mixer
pub async fn connect(conn: &Connection) -> Result<UdpSocket, NetworkError> {
    let remote = resolve_ipv4(conn).await?;

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .await
        .map_err(|e| NetworkError::BindFailed(e.to_string()))?;

    socket.connect(remote).await.map_err(|e| {
        tracing::error!(remote = %remote, error = %e, "Failed to connect UDP socket");
        NetworkError::ConnectionFailed(e.to_string())
    })?;

    tracing::info!("Connected to {}", remote);
    Ok(socket)
}
