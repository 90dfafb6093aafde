//! Client side of the `REMOVE` procedure (procedure 12) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.12.
//!
//! `REMOVE` deletes a non-directory entry. Both arms of the result carry the
//! wcc data of the parent directory.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::dir::REMOVE3res;
use crate::protocol::xdr::nfs3::{diropargs3, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    pub async fn nfsproc3_remove(&mut self, object: &diropargs3) -> Result<REMOVE3res, RpcError> {
        debug!("nfsproc3_remove({:?})", object);
        self.call(NFSProgram::NFSPROC3_REMOVE, object).await
    }
}
