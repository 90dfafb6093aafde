//! Protocol module implements the client side of the NFS version 3 protocol suite
//! as specified in RFC 1813.
//!
//! This module contains three main components:
//!
//! - `xdr`: External Data Representation (XDR) for serialization and deserialization
//!   of data structures according to RFC 1832.
//!
//! - `rpc`: Remote Procedure Call (RPC) protocol implementation: record marking,
//!   reconnecting transports, call/reply envelopes and credentials (RFC 5531).
//!
//! - `nfs`: Procedure clients of the NFS version 3, MOUNT and PORTMAP programs.

pub mod nfs;
pub mod rpc;
pub mod xdr;
