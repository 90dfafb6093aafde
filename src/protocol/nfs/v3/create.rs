//! Client side of the CREATE procedure (procedure 8) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.8.
//!
//! The three creation methods are:
//! - UNCHECKED: create the file, or truncate an existing one
//! - GUARDED: fail with `NFS3ERR_EXIST` if the name is taken
//! - EXCLUSIVE: idempotent create keyed by a client verifier
//!
//! A successful reply may omit the new file handle, in which case the
//! client has to look the name up.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::dir::{diropres3, CREATE3args};
use crate::protocol::xdr::nfs3::NFSProgram;

impl<C: Connector> Nfs3Client<C> {
    pub async fn nfsproc3_create(&mut self, args: &CREATE3args) -> Result<diropres3, RpcError> {
        debug!("nfsproc3_create({:?})", args);
        self.call(NFSProgram::NFSPROC3_CREATE, args).await
    }
}
