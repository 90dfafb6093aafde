//! Client side of the `GETATTR` procedure (procedure 1) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.1.
//!
//! `GETATTR` takes a file handle and returns the complete file attribute
//! structure defined in RFC 1813 section 2.3.5 (fattr3). A failed call
//! carries nothing but the status.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::{nfs_fh3, GETATTR3res, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    /// Calls `GETATTR` for `object`.
    pub async fn nfsproc3_getattr(&mut self, object: &nfs_fh3) -> Result<GETATTR3res, RpcError> {
        debug!("nfsproc3_getattr({:?})", object);
        self.call(NFSProgram::NFSPROC3_GETATTR, object).await
    }
}
