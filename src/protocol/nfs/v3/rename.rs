//! Client side of the `RENAME` procedure (procedure 14) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.14.
//!
//! The reply carries wcc data for both the source and the target directory,
//! whatever the status.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::dir::{RENAME3args, RENAME3res};
use crate::protocol::xdr::nfs3::NFSProgram;

impl<C: Connector> Nfs3Client<C> {
    pub async fn nfsproc3_rename(&mut self, args: &RENAME3args) -> Result<RENAME3res, RpcError> {
        debug!("nfsproc3_rename({:?} -> {:?})", args.from, args.to);
        self.call(NFSProgram::NFSPROC3_RENAME, args).await
    }
}
