//! Client side of the `LOOKUP` procedure (procedure 3) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.3.
//!
//! The `LOOKUP` procedure translates a name in a directory into a file handle.
//! On success the server returns the handle, the object attributes and the
//! directory attributes. On failure only the directory attributes follow.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::dir::LOOKUP3res;
use crate::protocol::xdr::nfs3::{diropargs3, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    /// Calls `LOOKUP` for `what.name` in `what.dir`.
    pub async fn nfsproc3_lookup(&mut self, what: &diropargs3) -> Result<LOOKUP3res, RpcError> {
        debug!("nfsproc3_lookup({:?})", what);
        let res: LOOKUP3res = self.call(NFSProgram::NFSPROC3_LOOKUP, what).await?;
        debug!("nfsproc3_lookup({:?}) --> {:?}", what.name, res.status());
        Ok(res)
    }
}
