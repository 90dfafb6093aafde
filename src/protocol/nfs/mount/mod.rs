//! MOUNT protocol client for NFS version 3 as specified in RFC 1813 Appendix I.
//! https://datatracker.ietf.org/doc/html/rfc1813#appendix-I
//!
//! MNT hands out the root file handle of an export, UMNT releases it and
//! EXPORT lists what the server exports. The procedures are methods of
//! [`Nfs3Client`] so one client talks to both programs of a server.

use super::v3::Nfs3Client;
use crate::error::RpcError;
use crate::protocol::rpc::{Connector, Credentials};
use crate::protocol::xdr::mount::{self, MountProgram};
use crate::protocol::xdr::{Deserialize, Serialize};

mod export;
mod mnt;
mod null;
mod umnt;

impl<C: Connector> Nfs3Client<C> {
    /// Calls a MOUNT procedure, with the client credentials unless `credentials` is given.
    async fn mount_call<A, R>(
        &mut self,
        proc: MountProgram,
        credentials: Option<&Credentials>,
        args: &A,
    ) -> Result<R, RpcError>
    where
        A: Serialize + ?Sized,
        R: Deserialize + Default,
    {
        let rpc = self.rpc_mut();
        match credentials {
            Some(credentials) => {
                rpc.call_with(mount::PROGRAM, mount::VERSION, proc as u32, credentials, args).await
            }
            None => rpc.call(mount::PROGRAM, mount::VERSION, proc as u32, args).await,
        }
    }
}
