//! Error types of the client.
//!
//! Failures come in two independent classes:
//!
//! - [`RpcError`]: the exchange itself failed. The connection could not be
//!   kept within the retry budget, the reply could not be decoded, or the RPC
//!   envelope reported a rejection or a non-success accept status.
//! - [`Error::Nfs`] / [`Error::Mount`]: a well-formed reply carried a status
//!   other than `OK`.

use thiserror::Error;

use crate::protocol::xdr::mount::mountstat3;
use crate::protocol::xdr::nfs3::nfsstat3;
use crate::protocol::xdr::rpc::auth_stat;

/// Transport and RPC envelope failures.
#[derive(Debug, Error)]
pub enum RpcError {
    /// No reply could be obtained within the reconnect budget
    #[error("transport failed after {attempts} connection attempts: {source}")]
    Transport {
        /// Connection attempts made by the failing call
        attempts: u32,
        /// Last underlying I/O failure
        #[source]
        source: std::io::Error,
    },
    /// The call could not be serialized and was never sent
    #[error("cannot encode call: {0}")]
    Encode(#[source] std::io::Error),
    /// The reply was not valid XDR for the expected type
    #[error("malformed reply: {0}")]
    Decode(#[from] std::io::Error),
    /// The server does not speak RPC version 2
    #[error("RPC version mismatch, server supports versions {low} to {high}")]
    RpcMismatch { low: u32, high: u32 },
    /// The server refused the credentials
    #[error("authentication failed: {0:?}")]
    AuthError(auth_stat),
    /// The program is not exported by the server
    #[error("program unavailable")]
    ProgUnavail,
    /// The program exists but not in the requested version
    #[error("program version mismatch, server supports versions {low} to {high}")]
    ProgMismatch { low: u32, high: u32 },
    /// The program does not implement the procedure
    #[error("procedure unavailable")]
    ProcUnavail,
    /// The server could not decode the arguments
    #[error("server could not decode the call arguments")]
    GarbageArgs,
    /// The server failed internally
    #[error("server system error")]
    SystemErr,
    /// A call message arrived where a reply was expected
    #[error("expected a reply message")]
    UnexpectedMessage,
    /// The port mapper has no TCP port for the program
    #[error("program {prog} version {vers} is not registered with the port mapper")]
    NotRegistered { prog: u32, vers: u32 },
}

/// Errors returned by the NFS client.
#[derive(Debug, Error)]
pub enum Error {
    /// The NFS server answered with a status other than `NFS3_OK`
    #[error("NFS error: {0:?}")]
    Nfs(nfsstat3),
    /// The MOUNT server answered with a status other than `MNT3_OK`
    #[error("MOUNT error: {0:?}")]
    Mount(mountstat3),
    /// The call did not produce a usable reply
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl Error {
    /// NFS status carried by the error, if it is an application error
    pub fn status(&self) -> Option<nfsstat3> {
        match self {
            Error::Nfs(stat) => Some(*stat),
            _ => None,
        }
    }

    /// True when the failure came from the transport or the RPC envelope
    pub fn is_rpc(&self) -> bool {
        matches!(self, Error::Rpc(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Rpc(RpcError::Decode(err))
    }
}

impl From<nfsstat3> for Error {
    fn from(stat: nfsstat3) -> Self {
        Error::Nfs(stat)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
