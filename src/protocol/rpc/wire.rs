//! RPC message framing as specified in RFC 5531 section 11 (Record Marking Standard).
//!
//! A record is sent as one or more fragments. Each fragment is prefixed by a
//! 4-byte big-endian header: the lower 31 bits hold the fragment length, the
//! highest bit is set on the last fragment of the record.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Upper bound of a reassembled record
pub const MAX_RPC_RECORD_LENGTH: usize = 64 * 1024 * 1024;

/// Largest fragment expressible in the 31-bit length field
pub const MAX_FRAGMENT_SIZE: usize = (1 << 31) - 1;

const LAST_FRAGMENT: u32 = 1 << 31;

/// Reads a single record-marked fragment and appends its payload to `append_to`.
///
/// Returns true if this was the last fragment of the record.
async fn read_fragment<S: AsyncRead + Unpin>(
    socket: &mut S,
    append_to: &mut Vec<u8>,
) -> io::Result<bool> {
    let mut header_buf = [0_u8; 4];
    socket.read_exact(&mut header_buf).await?;
    let fragment_header = u32::from_be_bytes(header_buf);
    let is_last = (fragment_header & LAST_FRAGMENT) > 0;
    let length = (fragment_header & !LAST_FRAGMENT) as usize;
    trace!("Reading fragment length:{}, last:{}", length, is_last);
    if append_to.len().saturating_add(length) > MAX_RPC_RECORD_LENGTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("RPC record length {} exceeds max {}", length, MAX_RPC_RECORD_LENGTH),
        ));
    }
    let start_offset = append_to.len();
    append_to.resize(start_offset + length, 0);
    socket.read_exact(&mut append_to[start_offset..]).await?;
    Ok(is_last)
}

/// Reads one complete record.
///
/// Fragments are concatenated until one with the last-fragment bit arrives.
/// A record made of a single fragment is read straight into the returned
/// buffer without an intermediate copy.
pub async fn read_message<S: AsyncRead + Unpin>(socket: &mut S) -> io::Result<Vec<u8>> {
    let mut message = Vec::new();
    while !read_fragment(socket, &mut message).await? {}
    trace!("Read record length:{}", message.len());
    Ok(message)
}

/// Writes `buf` as one record, split into fragments of at most `max_fragment_size` bytes.
///
/// An empty buffer is still sent as a single empty last fragment.
pub async fn write_message<S: AsyncWrite + Unpin>(
    socket: &mut S,
    buf: &[u8],
    max_fragment_size: usize,
) -> io::Result<()> {
    let max_fragment_size = max_fragment_size.clamp(1, MAX_FRAGMENT_SIZE);

    let mut offset = 0;
    loop {
        let remaining = buf.len() - offset;
        let fragment_size = std::cmp::min(remaining, max_fragment_size);
        let is_last = offset + fragment_size >= buf.len();

        // fragment_size <= MAX_FRAGMENT_SIZE, so it fits the 31-bit length field
        let fragment_header =
            if is_last { fragment_size as u32 | LAST_FRAGMENT } else { fragment_size as u32 };

        trace!("Writing fragment length:{}, last:{}", fragment_size, is_last);
        socket.write_all(&fragment_header.to_be_bytes()).await?;
        socket.write_all(&buf[offset..offset + fragment_size]).await?;

        offset += fragment_size;
        if is_last {
            break;
        }
    }

    socket.flush().await
}
