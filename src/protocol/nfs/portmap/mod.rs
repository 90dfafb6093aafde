//! PORTMAP protocol client as specified in RFC 1057 A.1 and A.2 sections.
//! https://datatracker.ietf.org/doc/rfc1057/
//!
//! The port mapper transport is created together with the [`RpcClient`] at
//! the well-known port 111, so these calls never need a lookup themselves.
//!
//! [`RpcClient`]: crate::protocol::rpc::RpcClient

mod get_port;
mod null;

pub use get_port::{get_port, pmapproc_getport};
pub use null::pmapproc_null;
