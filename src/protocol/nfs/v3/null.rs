//! Client side of the NULL procedure (procedure 0) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.0.

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::NFSProgram;

impl<C: Connector> Nfs3Client<C> {
    /// Pings the NFS server. Also validates the credentials.
    pub async fn nfsproc3_null(&mut self) -> Result<(), RpcError> {
        debug!("nfsproc3_null");
        self.call(NFSProgram::NFSPROC3_NULL, &()).await
    }
}
