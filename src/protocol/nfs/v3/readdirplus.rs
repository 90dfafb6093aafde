//! Client side of the `READDIRPLUS` procedure (procedure 17) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.17.
//!
//! The `READDIRPLUS` procedure is an extended version of READDIR that returns
//! file handles and attributes in addition to directory entries.
//!
//! A listing is read page by page. The first call uses cookie 0 and a zeroed
//! verifier; every following call passes the cookie of the last entry
//! received and the verifier of the previous reply, until a page has `eof` set.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::dir::{READDIRPLUS3args, READDIRPLUS3res};
use crate::protocol::xdr::nfs3::NFSProgram;

impl<C: Connector> Nfs3Client<C> {
    /// Reads one page of the directory `args.dir`.
    pub async fn nfsproc3_readdirplus(
        &mut self,
        args: &READDIRPLUS3args,
    ) -> Result<READDIRPLUS3res, RpcError> {
        debug!("nfsproc3_readdirplus({:?}, cookie {})", args.dir, args.cookie);
        self.call(NFSProgram::NFSPROC3_READDIRPLUS, args).await
    }
}
