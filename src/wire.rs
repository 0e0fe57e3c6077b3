//! Length-prefixed nullable byte sequences and checked fixed-width reads.
//!
//! Everything here is big-endian: the peers on the other side of a merge are
//! cluster members that speak network byte order, and the layout is part of
//! the cross-version wire contract.

use bytes::{Buf, BufMut, Bytes};

use crate::error::{Error, Result};

const MARKER_ABSENT: u8 = 0;
const MARKER_PRESENT: u8 = 1;

/// ```text
///     +---------------------+
///     | presence marker: u8 |
///     +---------------------+
///     | len: u32            |  only if present
///     +---------------------+
///     | raw bytes           |  only if present
///     +---------------------+
/// ```
pub(crate) fn put_nullable_bytes(buf: &mut impl BufMut, data: Option<&Bytes>) {
    match data {
        Some(data) => {
            buf.put_u8(MARKER_PRESENT);
            buf.put_u32(data.len() as u32);
            buf.put_slice(data);
        }
        None => buf.put_u8(MARKER_ABSENT),
    }
}

pub(crate) fn get_nullable_bytes(buf: &mut impl Buf) -> Result<Option<Bytes>> {
    if buf.remaining() < 1 {
        return Err(Error::Decode(
            "nullable bytes decode failed, buf too short".into(),
        ));
    }

    match buf.get_u8() {
        MARKER_ABSENT => Ok(None),
        MARKER_PRESENT => {
            if buf.remaining() < 4 {
                return Err(Error::Decode(
                    "nullable bytes decode failed, missing length".into(),
                ));
            }
            let len = buf.get_u32() as usize;
            if buf.remaining() < len {
                return Err(Error::Decode(format!(
                    "nullable bytes decode failed, need {len} bytes but {} remain",
                    buf.remaining()
                )));
            }
            Ok(Some(buf.copy_to_bytes(len)))
        }
        marker => Err(Error::Decode(format!("bad presence marker: {marker}"))),
    }
}

pub(crate) fn get_i64(buf: &mut impl Buf) -> Result<i64> {
    if buf.remaining() < 8 {
        return Err(Error::Decode(format!(
            "i64 decode failed, only {} bytes remain",
            buf.remaining()
        )));
    }

    Ok(buf.get_i64())
}
