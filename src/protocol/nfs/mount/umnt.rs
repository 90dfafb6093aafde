//! Client side of the UMNT procedure (procedure 3) for MOUNT version 3 protocol
//! as defined in RFC 1813 section 5.2.3
//! https://datatracker.ietf.org/doc/html/rfc1813#section-5.2.3
//!
//! UMNT removes the mount entry of the caller for the given directory. The
//! server answers with a void result.

use tracing::debug;

use crate::error::RpcError;
use crate::protocol::nfs::v3::Nfs3Client;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::mount::{dirpath, MountProgram};

impl<C: Connector> Nfs3Client<C> {
    pub async fn mountproc3_umnt(&mut self, path: &str) -> Result<(), RpcError> {
        debug!("mountproc3_umnt({:?})", path);
        let args = dirpath(path.to_string());
        self.mount_call(MountProgram::MOUNTPROC3_UMNT, None, &args).await
    }
}
