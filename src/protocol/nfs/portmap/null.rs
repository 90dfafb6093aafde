//! Client side of the NULL procedure (procedure 0) for PORTMAP protocol
//! as defined in RFC 5531 (previously RFC 1057 Appendix A).
//!
//! The NULL procedure does no work. It is available to allow server response testing
//! and timing. It has no arguments and returns nothing.

use tracing::debug;

use crate::error::RpcError;
use crate::protocol::rpc::{Connector, Credentials, RpcClient};
use crate::protocol::xdr::portmap::{self, PortmapProgram};

/// Pings the port mapper.
pub async fn pmapproc_null<C: Connector>(client: &mut RpcClient<C>) -> Result<(), RpcError> {
    debug!("pmapproc_null");
    let proc = PortmapProgram::PMAPPROC_NULL as u32;
    client.call_registered(portmap::PROGRAM, portmap::VERSION, proc, &Credentials::Null, &()).await
}
