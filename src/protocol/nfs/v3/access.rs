//! Client side of the ACCESS procedure (procedure 4) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.4.
//!
//! The ACCESS procedure determines the access rights that a user, as identified
//! by the credentials of the call, has with respect to a file system object.
//! The server answers with the subset of the requested `ACCESS3_*` bits it grants.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::file::{ACCESS3args, ACCESS3res};
use crate::protocol::xdr::nfs3::{nfs_fh3, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    /// Calls `ACCESS` asking for the `access` bits on `object`.
    pub async fn nfsproc3_access(
        &mut self,
        object: &nfs_fh3,
        access: u32,
    ) -> Result<ACCESS3res, RpcError> {
        debug!("nfsproc3_access({:?}, {:#x})", object, access);
        let args = ACCESS3args { object: object.clone(), access };
        self.call(NFSProgram::NFSPROC3_ACCESS, &args).await
    }
}
