//! Client side of the GETPORT procedure (procedure 3) for port mapper protocol
//! as defined in RFC 1057 A.2 section.
//! https://datatracker.ietf.org/doc/rfc1057/

use tracing::debug;

use crate::error::RpcError;
use crate::protocol::rpc::{Connector, Credentials, RpcClient};
use crate::protocol::xdr::portmap::{self, mapping, PortmapProgram};

/// Calls `PMAPPROC_GETPORT` with `mapping` and returns the raw port value.
///
/// The port mapper answers 0 when the program is not registered.
pub async fn pmapproc_getport<C: Connector>(
    client: &mut RpcClient<C>,
    mapping: &mapping,
) -> Result<u32, RpcError> {
    debug!("pmapproc_getport({:?})", mapping);
    let proc = PortmapProgram::PMAPPROC_GETPORT as u32;
    client
        .call_registered(portmap::PROGRAM, portmap::VERSION, proc, &Credentials::Null, mapping)
        .await
}

/// Resolves the TCP port of `prog` version `vers`.
pub async fn get_port<C: Connector>(
    client: &mut RpcClient<C>,
    prog: u32,
    vers: u32,
) -> Result<u16, RpcError> {
    let query = mapping { prog, vers, prot: portmap::IPPROTO_TCP, port: 0 };
    let port = pmapproc_getport(client, &query).await?;
    match u16::try_from(port) {
        Ok(0) => Err(RpcError::NotRegistered { prog, vers }),
        Ok(port) => Ok(port),
        Err(_) => Err(RpcError::Decode(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("port mapper returned invalid port {port}"),
        ))),
    }
}
