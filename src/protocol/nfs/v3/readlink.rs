//! Client side of the READLINK procedure (procedure 5) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.5.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::file::READLINK3res;
use crate::protocol::xdr::nfs3::{nfs_fh3, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    /// Reads the target of the symbolic link `symlink`.
    pub async fn nfsproc3_readlink(&mut self, symlink: &nfs_fh3) -> Result<READLINK3res, RpcError> {
        debug!("nfsproc3_readlink({:?})", symlink);
        self.call(NFSProgram::NFSPROC3_READLINK, symlink).await
    }
}
