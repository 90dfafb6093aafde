//! The TCP module opens the connections RPC transports run on.
//!
//! Every connection:
//! - resolves the server host and tries each address in turn
//! - sets `SO_REUSEADDR`, so a fixed local port can be rebound right after a
//!   previous connection from it was closed
//! - optionally binds a fixed local port (some servers only accept
//!   privileged source ports)
//! - disables Nagle's algorithm, RPC messages are small and latency bound

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use tokio::net::{lookup_host, TcpSocket, TcpStream};
use tracing::debug;

use crate::protocol::rpc::Connector;

/// [`Connector`] opening TCP connections to one server host.
#[derive(Clone, Debug)]
pub struct TcpConnector {
    host: String,
    local_port: Option<u16>,
}

impl TcpConnector {
    pub fn new(host: impl Into<String>, local_port: Option<u16>) -> Self {
        TcpConnector { host: host.into(), local_port }
    }

    async fn connect_addr(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        if let Some(port) = self.local_port {
            let local: SocketAddr = match addr {
                SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, port).into(),
                SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, port).into(),
            };
            socket.bind(local)?;
        }
        let stream = socket.connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, port: u16) -> io::Result<TcpStream> {
        let mut last_error = None;
        for addr in lookup_host((self.host.as_str(), port)).await? {
            match self.connect_addr(addr).await {
                Ok(stream) => {
                    debug!("Connected to {}", addr);
                    return Ok(stream);
                }
                Err(e) => {
                    debug!("Connecting to {} failed: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} has no addresses", self.host))
        }))
    }
}
