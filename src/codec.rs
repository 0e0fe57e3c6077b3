use bytes::Bytes;

use crate::error::Result;

/// Turns an opaque encoded byte sequence back into a typed in-memory object.
///
/// The codec is owned by the surrounding cluster runtime; a merge entry only
/// borrows it for the duration of a decode call and never stores it.
pub trait ObjectCodec {
    type Object;

    fn decode(&self, data: &Bytes) -> Result<Self::Object>;
}
