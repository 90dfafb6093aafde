//! Client side of the NULL procedure (procedure 0) for MOUNT version 3 protocol
//! as defined in RFC 1813 section 5.2.0.

use tracing::debug;

use crate::error::RpcError;
use crate::protocol::nfs::v3::Nfs3Client;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::mount::MountProgram;

impl<C: Connector> Nfs3Client<C> {
    /// Pings the MOUNT server.
    pub async fn mountproc3_null(&mut self) -> Result<(), RpcError> {
        debug!("mountproc3_null");
        self.mount_call(MountProgram::MOUNTPROC3_NULL, None, &()).await
    }
}
