//! Client side of the EXPORT procedure (procedure 5) for `MOUNT` version 3 protocol
//! as defined in RFC 1813 section 5.2.5.
//! <https://datatracker.ietf.org/doc/html/rfc1813#section-5.2.5>.

use tracing::debug;

use crate::error::RpcError;
use crate::protocol::nfs::v3::Nfs3Client;
use crate::protocol::rpc::{Connector, Credentials};
use crate::protocol::xdr::mount::{exports, MountProgram};

impl<C: Connector> Nfs3Client<C> {
    /// Lists the exported file systems and the groups allowed to mount each one.
    ///
    /// The call is unauthenticated.
    pub async fn mountproc3_export(&mut self) -> Result<exports, RpcError> {
        let list: exports =
            self.mount_call(MountProgram::MOUNTPROC3_EXPORT, Some(&Credentials::Null), &()).await?;
        debug!("mountproc3_export --> {} exports", list.0.len());
        Ok(list)
    }
}
