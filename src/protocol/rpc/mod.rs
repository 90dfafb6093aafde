//! RPC (Remote Procedure Call) client side as specified in RFC 5531 (previously RFC 1057).
//!
//! Layers, bottom-up:
//!
//! 1. `wire`: record marking of messages on a byte stream
//! 2. `transport`: lazily connected, reconnecting stream to one server port
//! 3. `envelope`: call headers and reply header checks
//! 4. `client`: one transport per program, transaction ids, credentials

mod auth;
mod client;
mod envelope;
mod transport;
mod wire;

pub use auth::{Credentials, DEFAULT_MACHINE_NAME, MAX_MACHINE_NAME_LEN, NOBODY};
pub use client::RpcClient;
pub use envelope::{check_reply, decode_reply, encode_call};
pub use transport::{Connector, Transport};
pub use wire::{read_message, write_message, MAX_FRAGMENT_SIZE, MAX_RPC_RECORD_LENGTH};
