//! Client side of the `MKDIR` procedure (procedure 9) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.9.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::dir::{diropres3, MKDIR3args};
use crate::protocol::xdr::nfs3::NFSProgram;

impl<C: Connector> Nfs3Client<C> {
    /// Creates the directory `args.dirops.name` in `args.dirops.dir`.
    pub async fn nfsproc3_mkdir(&mut self, args: &MKDIR3args) -> Result<diropres3, RpcError> {
        debug!("nfsproc3_mkdir({:?})", args);
        self.call(NFSProgram::NFSPROC3_MKDIR, args).await
    }
}
