//! Client side of the READ procedure (procedure 6) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.6.
//!
//! The server may return fewer bytes than requested. `eof` tells whether the
//! read reached the end of the file.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::file::{READ3args, READ3res};
use crate::protocol::xdr::nfs3::NFSProgram;

impl<C: Connector> Nfs3Client<C> {
    pub async fn nfsproc3_read(&mut self, args: &READ3args) -> Result<READ3res, RpcError> {
        debug!("nfsproc3_read({:?}, {}, {})", args.file, args.offset, args.count);
        self.call(NFSProgram::NFSPROC3_READ, args).await
    }
}
