//! Client side of the MNT procedure (procedure 1) for MOUNT version 3 protocol
//! as defined in RFC 1813 Appendix I section I.4.2.
//!
//! MNT takes a directory path and, if the server exports it to the caller,
//! returns the root file handle of that path and the authentication flavors
//! the server accepts for it.

use tracing::debug;

use crate::error::RpcError;
use crate::protocol::nfs::v3::Nfs3Client;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::mount::{dirpath, mountres3, MountProgram};

impl<C: Connector> Nfs3Client<C> {
    /// Mounts the exported directory `path`.
    pub async fn mountproc3_mnt(&mut self, path: &str) -> Result<mountres3, RpcError> {
        debug!("mountproc3_mnt({:?})", path);
        let args = dirpath(path.to_string());
        self.mount_call(MountProgram::MOUNTPROC3_MNT, None, &args).await
    }
}
