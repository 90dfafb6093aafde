//! Client side of the FSSTAT procedure (procedure 18) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.18.
//!
//! FSSTAT returns volatile file system state: total and free space, total and
//! free file slots, and `invarsec`, the number of seconds the server expects
//! those values to stay unchanged.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::fs::FSSTAT3res;
use crate::protocol::xdr::nfs3::{nfs_fh3, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    pub async fn nfsproc3_fsstat(&mut self, fsroot: &nfs_fh3) -> Result<FSSTAT3res, RpcError> {
        debug!("nfsproc3_fsstat({:?})", fsroot);
        self.call(NFSProgram::NFSPROC3_FSSTAT, fsroot).await
    }
}
