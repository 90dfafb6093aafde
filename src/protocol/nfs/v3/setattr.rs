//! Client side of the `SETATTR` procedure (procedure 2) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.2.
//!
//! The client specifies:
//! - The file handle of the object
//! - The attributes to change (`sattr3`), every member optional
//! - An optional guard: the change is applied only if the object's ctime
//!   still matches the given value
//!
//! Both the success and failure arms carry the object's wcc data.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::{NFSProgram, SETATTR3args, SETATTR3res};

impl<C: Connector> Nfs3Client<C> {
    /// Calls `SETATTR`.
    pub async fn nfsproc3_setattr(&mut self, args: &SETATTR3args) -> Result<SETATTR3res, RpcError> {
        debug!("nfsproc3_setattr({:?})", args);
        self.call(NFSProgram::NFSPROC3_SETATTR, args).await
    }
}
