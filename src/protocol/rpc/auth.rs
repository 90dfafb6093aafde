//! Credentials attached to outgoing calls (RFC 5531 section 8 and Appendix A).

use crate::protocol::xdr::rpc::{auth_flavor, auth_unix, opaque_auth};
use crate::protocol::xdr::Serialize;

/// Identity of the `nobody` user and group
pub const NOBODY: u32 = 65534;

/// Machine name sent in default credentials
pub const DEFAULT_MACHINE_NAME: &str = "localhost";

/// Longest machine name `AUTH_UNIX` can carry
pub const MAX_MACHINE_NAME_LEN: usize = 255;

/// Credentials used to authenticate a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// `AUTH_NULL`, no identity at all
    Null,
    /// `AUTH_UNIX` (also known as `AUTH_SYS`)
    Unix {
        /// Name of the calling machine
        machine_name: String,
        /// Effective user id
        uid: u32,
        /// Effective group id
        gid: u32,
        /// Supplementary group ids
        gids: Vec<u32>,
    },
}

impl Default for Credentials {
    /// Unix credentials of the `nobody` user.
    fn default() -> Self {
        Credentials::unix(NOBODY, NOBODY, Vec::new())
    }
}

impl Credentials {
    /// Unix credentials with the default machine name
    pub fn unix(uid: u32, gid: u32, gids: Vec<u32>) -> Self {
        Credentials::Unix { machine_name: DEFAULT_MACHINE_NAME.to_string(), uid, gid, gids }
    }

    /// Encodes the credentials as the `cred` field of a call header.
    pub fn to_opaque_auth(&self) -> std::io::Result<opaque_auth> {
        match self {
            Credentials::Null => Ok(opaque_auth::default()),
            Credentials::Unix { machine_name, uid, gid, gids } => {
                if machine_name.len() > MAX_MACHINE_NAME_LEN {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("machine name longer than {MAX_MACHINE_NAME_LEN} bytes"),
                    ));
                }
                let unix = auth_unix {
                    stamp: 0,
                    machinename: machine_name.as_bytes().to_vec(),
                    uid: *uid,
                    gid: *gid,
                    gids: gids.clone(),
                };
                let mut body = Vec::new();
                unix.serialize(&mut body)?;
                Ok(opaque_auth { flavor: auth_flavor::AUTH_UNIX, body })
            }
        }
    }
}
