//! Client side of the `RMDIR` procedure (procedure 13) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.13.
//!
//! Arguments and results have the same shape as `REMOVE`. The directory
//! must be empty.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::dir::REMOVE3res;
use crate::protocol::xdr::nfs3::{diropargs3, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    pub async fn nfsproc3_rmdir(&mut self, object: &diropargs3) -> Result<REMOVE3res, RpcError> {
        debug!("nfsproc3_rmdir({:?})", object);
        self.call(NFSProgram::NFSPROC3_RMDIR, object).await
    }
}
