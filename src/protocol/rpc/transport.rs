//! Reconnecting record-marked stream transport.
//!
//! A [`Transport`] talks to one port of the server. It connects lazily and
//! exchanges exactly one record per call. Any I/O failure drops the
//! connection; the next attempt reconnects, within a bounded budget.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use super::wire;
use crate::config::TransportConfig;
use crate::error::RpcError;

/// Connection attempts allowed to a transport that has never been connected
const FIRST_CONNECT_ATTEMPTS: u32 = 2;

/// Opens byte streams to a server port.
#[async_trait]
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Establishes a new connection to `port` on the server
    async fn connect(&self, port: u16) -> io::Result<Self::Stream>;
}

/// Lazily connected stream to one server port.
pub struct Transport<C: Connector> {
    connector: Arc<C>,
    port: u16,
    config: TransportConfig,
    stream: Option<C::Stream>,
    was_connected: bool,
}

impl<C: Connector> Transport<C> {
    pub fn new(connector: Arc<C>, port: u16, config: TransportConfig) -> Self {
        Transport { connector, port, config, stream: None, was_connected: false }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// True while a stream is held. This is not a liveness check
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Sends `message` as one record and returns the reply record.
    ///
    /// The call may use up to `max_attempts` connection attempts if the
    /// transport was connected before, and two otherwise. A failed exchange
    /// drops the stream and forces a reconnect, which consumes budget.
    /// `retry_delay` is awaited before retrying a failed connection attempt.
    pub async fn send_and_receive(&mut self, message: &[u8]) -> Result<Vec<u8>, RpcError> {
        let budget = if self.was_connected {
            self.config.max_attempts.max(1)
        } else {
            FIRST_CONNECT_ATTEMPTS
        };
        let mut attempts = 0;
        let mut connect_failed = false;
        let mut last_error = None;

        loop {
            if self.stream.is_none() {
                if attempts >= budget {
                    let source = last_error.unwrap_or_else(|| {
                        io::Error::new(io::ErrorKind::NotConnected, "no connection attempt made")
                    });
                    return Err(RpcError::Transport { attempts, source });
                }
                if connect_failed && !self.config.retry_delay.is_zero() {
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                attempts += 1;
                match self.connector.connect(self.port).await {
                    Ok(stream) => {
                        debug!("connected to port {} (attempt {})", self.port, attempts);
                        connect_failed = false;
                        self.was_connected = true;
                        self.stream = Some(stream);
                    }
                    Err(e) => {
                        warn!("connect to port {} failed (attempt {}): {}", self.port, attempts, e);
                        connect_failed = true;
                        last_error = Some(e);
                        continue;
                    }
                }
            }
            let Some(stream) = self.stream.as_mut() else {
                continue;
            };

            match exchange(stream, message, self.config.max_fragment_size).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    warn!("exchange on port {} failed, reconnecting: {}", self.port, e);
                    self.stream = None;
                    last_error = Some(e);
                }
            }
        }
    }

    /// Shuts the stream down. The next call reconnects
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!("shutdown of port {} failed: {}", self.port, e);
            }
        }
    }
}

async fn exchange<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut S,
    message: &[u8],
    max_fragment_size: usize,
) -> io::Result<Vec<u8>> {
    wire::write_message(stream, message, max_fragment_size).await?;
    wire::read_message(stream).await
}
