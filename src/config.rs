//! Client configuration.

use std::time::Duration;

use crate::protocol::rpc::{Credentials, MAX_FRAGMENT_SIZE};

/// Reconnect and framing settings of a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Connection attempts per call once the transport has been connected before.
    /// A transport that never connected gets one retry.
    pub max_attempts: u32,
    /// Pause before retrying a failed connection attempt
    pub retry_delay: Duration,
    /// Largest fragment written on the wire
    pub max_fragment_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            max_attempts: 20,
            retry_delay: Duration::from_secs(1),
            max_fragment_size: MAX_FRAGMENT_SIZE,
        }
    }
}

/// Settings of a mounted NFS client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Server host name or address
    pub host: String,
    /// Exported path to mount
    pub export: String,
    /// Credentials sent with every call
    pub credentials: Credentials,
    /// Local port to bind outgoing connections to
    pub local_port: Option<u16>,
    /// Known NFS port, skips the port mapper lookup
    pub nfs_port: Option<u16>,
    /// Known MOUNT port, skips the port mapper lookup
    pub mount_port: Option<u16>,
    pub transport: TransportConfig,
    /// Lower bound of how long FSSTAT results are cached
    pub min_fsstat_ttl: Duration,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, export: impl Into<String>) -> Self {
        ClientConfig {
            host: host.into(),
            export: export.into(),
            credentials: Credentials::default(),
            local_port: None,
            nfs_port: None,
            mount_port: None,
            transport: TransportConfig::default(),
            min_fsstat_ttl: Duration::from_secs(1),
        }
    }
}
