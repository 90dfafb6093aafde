//! Client side of the `WRITE` procedure (procedure 7) for NFS version 3 protocol
//! as defined in RFC 1813 section 3.3.7.
//!
//! Writes are always sent as `UNSTABLE`: the server may reply before the data
//! reaches stable storage. `COMMIT` flushes such data.
//!
//! On return the server provides:
//! - The file attributes before and after the write (weak cache consistency),
//!   in both the success and the failure arm
//! - The number of bytes actually written
//! - The stability level used for the write
//! - A write verifier to detect server restarts

use tracing::debug;

use super::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::Connector;
use crate::protocol::xdr::nfs3::file::{stable_how, WRITE3args, WRITE3res};
use crate::protocol::xdr::nfs3::{nfs_fh3, offset3, NFSProgram};

impl<C: Connector> Nfs3Client<C> {
    /// Writes `data` at `offset` of `file`.
    pub async fn nfsproc3_write(
        &mut self,
        file: &nfs_fh3,
        offset: offset3,
        data: &[u8],
    ) -> Result<WRITE3res, RpcError> {
        let count = u32::try_from(data.len()).map_err(|_| {
            RpcError::Encode(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("write of {} bytes exceeds the protocol limit", data.len()),
            ))
        })?;
        debug!("nfsproc3_write({:?}, {}, {})", file, offset, count);
        let args = WRITE3args {
            file: file.clone(),
            offset,
            count,
            stable: stable_how::UNSTABLE,
            data: data.to_vec(),
        };
        self.call(NFSProgram::NFSPROC3_WRITE, &args).await
    }
}
