//! Client side of the `FSINFO` procedure (procedure 19) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.19.
//!
//! The `FSINFO` procedure retrieves static information about the exported file
//! system: preferred and maximum transfer sizes, maximum file size, time
//! granularity and feature flags. It is fetched once per mount.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::fs::FSINFO3res;
use crate::protocol::xdr::nfs3::{nfs_fh3, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    pub async fn nfsproc3_fsinfo(&mut self, fsroot: &nfs_fh3) -> Result<FSINFO3res, RpcError> {
        debug!("nfsproc3_fsinfo({:?})", fsroot);
        self.call(NFSProgram::NFSPROC3_FSINFO, fsroot).await
    }
}
