//! Client side of the `COMMIT` procedure (procedure 21) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.21.
//!
//! `COMMIT` flushes data previously written with `UNSTABLE` to stable
//! storage. A count of 0 means everything from `offset` to the end of file.
//! If the returned verifier differs from the one returned by the writes,
//! the server restarted in between and the data must be written again.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::file::{COMMIT3args, COMMIT3res};
use crate::protocol::xdr::nfs3::NFSProgram;

impl<C: Connector> Nfs3Client<C> {
    pub async fn nfsproc3_commit(&mut self, args: &COMMIT3args) -> Result<COMMIT3res, RpcError> {
        debug!("nfsproc3_commit({:?}, {}, {})", args.file, args.offset, args.count);
        self.call(NFSProgram::NFSPROC3_COMMIT, args).await
    }
}
