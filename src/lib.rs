//! NFS Mamont client - A Network File System (NFS) version 3 client in Rust
//!
//! This library talks to NFS servers over ONC RPC on TCP, as defined in
//! RFC 1813, and keeps a client side cache of file attributes.
//!
//! ## Main Components
//!
//! - `client`: [`NfsClient`], a mounted export with an attribute cache, an
//!   FSSTAT cache and paged directory listing. Operations work on file
//!   handles and plain data only.
//!
//! - `protocol`: the XDR codec, record marking, the RPC envelope, the
//!   reconnecting transport and the PORTMAP, MOUNT and NFS procedure clients.
//!
//! - `tcp`: [`TcpConnector`], the TCP dialer transports connect through.
//!
//! - `error`: transport and envelope failures ([`RpcError`]) kept apart from
//!   NFS status errors ([`Error::Nfs`]).
//!
//! ## Standards Compliance
//!
//! This implementation follows these RFCs:
//! - RFC 1813: NFS Version 3 Protocol Specification
//! - RFC 5531: RPC: Remote Procedure Call Protocol Specification Version 2 (obsoletes RFC 1831)
//! - RFC 1832: XDR: External Data Representation Standard (obsoletes RFC 1014)
//! - RFC 1833: Binding Protocols for ONC RPC Version 2
//!
//! ## Usage
//!
//! Build a [`ClientConfig`] for a host and export, then [`NfsClient::mount`] it.
//! [`list_exports`] asks a server what it exports without mounting anything.

pub mod client;
pub mod config;
pub mod error;
pub mod fs_util;
pub mod protocol;
pub mod tcp;

pub use client::{list_exports, list_exports_with, NfsClient};
pub use config::{ClientConfig, TransportConfig};
pub use error::{Error, Result, RpcError};
pub use protocol::rpc::{Connector, Credentials};
pub use protocol::xdr;
pub use tcp::TcpConnector;
