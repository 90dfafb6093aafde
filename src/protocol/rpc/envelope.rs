//! Call header encoding and reply header checking (RFC 5531 section 9).

use std::io::Cursor;

use tracing::debug;

use super::Credentials;
use crate::error::RpcError;
use crate::protocol::xdr::rpc::{
    accept_body, call_message, rejected_reply, reply_body, rpc_body, rpc_msg,
};
use crate::protocol::xdr::{deserialize, Serialize};

/// Serializes a call header followed by the procedure arguments.
///
/// Arguments that have no XDR representation, such as a string with
/// characters outside Latin-1, yield [`RpcError::Encode`].
pub fn encode_call<A: Serialize + ?Sized>(
    xid: u32,
    prog: u32,
    vers: u32,
    proc: u32,
    credentials: &Credentials,
    args: &A,
) -> Result<Vec<u8>, RpcError> {
    let mut buf = Vec::new();
    let cred = credentials.to_opaque_auth().map_err(RpcError::Encode)?;
    call_message(xid, prog, vers, proc, cred).serialize(&mut buf).map_err(RpcError::Encode)?;
    args.serialize(&mut buf).map_err(RpcError::Encode)?;
    Ok(buf)
}

/// Maps a reply header onto success or the matching [`RpcError`].
///
/// Only an accepted reply with `SUCCESS` is a success.
pub fn check_reply(msg: &rpc_msg) -> Result<(), RpcError> {
    let reply = match &msg.body {
        rpc_body::REPLY(reply) => reply,
        rpc_body::CALL(_) => return Err(RpcError::UnexpectedMessage),
    };

    match reply {
        reply_body::MSG_ACCEPTED(accepted) => match &accepted.reply_data {
            accept_body::SUCCESS => Ok(()),
            accept_body::PROG_UNAVAIL => Err(RpcError::ProgUnavail),
            accept_body::PROG_MISMATCH(info) => {
                Err(RpcError::ProgMismatch { low: info.low, high: info.high })
            }
            accept_body::PROC_UNAVAIL => Err(RpcError::ProcUnavail),
            accept_body::GARBAGE_ARGS => Err(RpcError::GarbageArgs),
            accept_body::SYSTEM_ERR => Err(RpcError::SystemErr),
        },
        reply_body::MSG_DENIED(rejected_reply::RPC_MISMATCH(info)) => {
            Err(RpcError::RpcMismatch { low: info.low, high: info.high })
        }
        reply_body::MSG_DENIED(rejected_reply::AUTH_ERROR(stat)) => Err(RpcError::AuthError(*stat)),
    }
}

/// Decodes the reply header of `reply` and returns a cursor positioned at the results.
///
/// The transport carries one outstanding call at a time, so the reply xid is
/// not matched against the call.
pub fn decode_reply(reply: Vec<u8>) -> Result<Cursor<Vec<u8>>, RpcError> {
    let mut cursor = Cursor::new(reply);
    let msg = deserialize::<rpc_msg>(&mut cursor)?;
    if let Err(e) = check_reply(&msg) {
        debug!("call {} failed: {}", msg.xid, e);
        return Err(e);
    }
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::xdr::rpc::{
        auth_stat, garbage_args_reply_message, make_success_reply, mismatch_info,
        prog_mismatch_reply_message, rejected_reply_message,
    };

    fn reply_bytes(msg: rpc_msg) -> Vec<u8> {
        let mut buf = Vec::new();
        msg.serialize(&mut buf).unwrap();
        buf
    }

    #[test]
    fn success_leaves_cursor_at_results() {
        let mut buf = reply_bytes(make_success_reply(7));
        let header_len = buf.len() as u64;
        42_u32.serialize(&mut buf).unwrap();

        let mut cursor = decode_reply(buf).unwrap();
        assert_eq!(cursor.position(), header_len);
        assert_eq!(deserialize::<u32>(&mut cursor).unwrap(), 42);
    }

    #[test]
    fn version_ranges_are_reported() {
        let err = decode_reply(reply_bytes(prog_mismatch_reply_message(1, 2, 4))).unwrap_err();
        assert!(matches!(err, RpcError::ProgMismatch { low: 2, high: 4 }));
        assert!(err.to_string().contains("2 to 4"));

        let rejected = rejected_reply_message(1, rejected_reply::RPC_MISMATCH(mismatch_info {
            low: 2,
            high: 2,
        }));
        let err = decode_reply(reply_bytes(rejected)).unwrap_err();
        assert!(matches!(err, RpcError::RpcMismatch { low: 2, high: 2 }));
    }

    #[test]
    fn rejections_are_errors() {
        let denied =
            rejected_reply_message(3, rejected_reply::AUTH_ERROR(auth_stat::AUTH_TOOWEAK));
        let err = decode_reply(reply_bytes(denied)).unwrap_err();
        assert!(matches!(err, RpcError::AuthError(auth_stat::AUTH_TOOWEAK)));

        let err = decode_reply(reply_bytes(garbage_args_reply_message(3))).unwrap_err();
        assert!(matches!(err, RpcError::GarbageArgs));
    }

    #[test]
    fn call_is_not_a_reply() {
        let call = encode_call(9, 100003, 3, 0, &Credentials::Null, &()).unwrap();
        let err = decode_reply(call).unwrap_err();
        assert!(matches!(err, RpcError::UnexpectedMessage));
    }

    #[test]
    fn unencodable_arguments_are_encode_errors() {
        let err = encode_call(1, 100005, 3, 1, &Credentials::Null, "/\u{263a}").unwrap_err();
        assert!(matches!(err, RpcError::Encode(_)), "{err:?}");
        assert!(err.to_string().starts_with("cannot encode call"));

        let long_name = Credentials::Unix {
            machine_name: "h".repeat(256),
            uid: 0,
            gid: 0,
            gids: Vec::new(),
        };
        let err = encode_call(1, 100003, 3, 0, &long_name, &()).unwrap_err();
        assert!(matches!(err, RpcError::Encode(_)), "{err:?}");
    }

    #[test]
    fn call_header_layout() {
        let call = encode_call(0x01020304, 100003, 3, 1, &Credentials::Null, &5_u32).unwrap();
        let words: Vec<u32> = call
            .chunks(4)
            .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]))
            .collect();
        // xid, CALL, rpcvers, prog, vers, proc, cred, verf, args
        assert_eq!(words, [0x01020304, 0, 2, 100003, 3, 1, 0, 0, 0, 0, 5]);
    }
}
