//! NFSv3 (Network File System version 3) procedure client as specified in RFC 1813.
//!
//! [`Nfs3Client`] exposes one method per procedure used by this crate:
//!
//! - NULL - Do nothing (ping the server)
//! - GETATTR - Get file attributes
//! - SETATTR - Set file attributes
//! - LOOKUP - Look up file name
//! - ACCESS - Check access permission
//! - READLINK - Read from symbolic link
//! - READ - Read from file
//! - WRITE - Write to file
//! - CREATE - Create a file
//! - MKDIR - Create a directory
//! - REMOVE - Remove a file
//! - RMDIR - Remove a directory
//! - RENAME - Rename a file or directory
//! - READDIRPLUS - Extended read from directory
//! - FSSTAT - Get file system statistics
//! - FSINFO - Get file system information
//! - COMMIT - Commit cached data
//!
//! Each procedure lives in its own module. A method encodes its arguments,
//! performs one call and returns the status-tagged result as the server sent
//! it. Interpreting a non-OK status is left to the caller, while failures of
//! the exchange itself come back as [`RpcError`].
//!
//! The MOUNT procedures are implemented on the same client in
//! [`crate::protocol::nfs::mount`].

use crate::error::RpcError;
use crate::protocol::rpc::{Connector, RpcClient};
use crate::protocol::xdr::nfs3::{self, NFSProgram};
use crate::protocol::xdr::{Deserialize, Serialize};

mod access;
mod commit;
mod create;
mod fsinfo;
mod fsstat;
mod getattr;
mod lookup;
mod mkdir;
mod null;
mod read;
mod readdirplus;
mod readlink;
mod remove;
mod rename;
mod rmdir;
mod setattr;
mod write;

/// Procedure level client of the NFS and MOUNT programs of one server.
pub struct Nfs3Client<C: Connector> {
    rpc: RpcClient<C>,
}

impl<C: Connector> Nfs3Client<C> {
    pub fn new(rpc: RpcClient<C>) -> Self {
        Nfs3Client { rpc }
    }

    /// The underlying RPC client
    pub fn rpc_mut(&mut self) -> &mut RpcClient<C> {
        &mut self.rpc
    }

    async fn call<A, R>(&mut self, proc: NFSProgram, args: &A) -> Result<R, RpcError>
    where
        A: Serialize + ?Sized,
        R: Deserialize + Default,
    {
        self.rpc.call(nfs3::PROGRAM, nfs3::VERSION, proc as u32, args).await
    }

    /// Releases the transports of every program
    pub async fn close(&mut self) {
        self.rpc.close().await
    }
}
