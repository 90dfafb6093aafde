//! Clients of the RPC programs an NFS version 3 mount needs:
//!
//! - `v3`: the NFS version 3 procedures as specified in RFC 1813.
//!
//! - `mount`: the MOUNT protocol, which provides the root file handle of an
//!   export. The procedures are implemented on the same client type as `v3`.
//!
//! - `portmap`: the PORTMAP protocol (also known as RPCBIND), used to find the
//!   ports of the NFS and MOUNT programs.

pub mod mount;
pub mod portmap;
pub mod v3;
