use bytes::{Buf, BufMut, Bytes};

use crate::{
    codec::ObjectCodec,
    error::Result,
    wire::{get_i64, get_nullable_bytes, put_nullable_bytes},
};

/// On-wire sentinel for a numeric field the caller never provided.
pub const UNSET: i64 = -1;

/// Snapshot of one cache entry handed to a merge policy during split-brain
/// reconciliation.
///
/// Key and value are kept in the cluster's encoded binary form and never
/// interpreted here; equality is byte-exact on both, plus the four metadata
/// fields. The entry is immutable once built — construct it through
/// [`MergeEntry::builder`].
///
/// ```text
///     +----------------------------+
///     | key: nullable bytes        |
///     +----------------------------+
///     | value: nullable bytes      |
///     +----------------------------+
///     | creation time: i64         |
///     +----------------------------+
///     | expiration time: i64       |
///     +----------------------------+
///     | hits: i64                  |
///     +----------------------------+
///     | last access time: i64      |
///     +----------------------------+
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MergeEntry {
    key: Option<Bytes>,
    value: Option<Bytes>,
    creation_time: Option<i64>,
    expiration_time: Option<i64>,
    hits: Option<i64>,
    last_access_time: Option<i64>,
}

impl MergeEntry {
    pub fn builder() -> MergeEntryBuilder {
        MergeEntryBuilder::new()
    }

    /// The cache key in its encoded binary form, if present.
    pub fn key_bytes(&self) -> Option<&Bytes> {
        self.key.as_ref()
    }

    /// The cache value in its encoded binary form, if present.
    pub fn value_bytes(&self) -> Option<&Bytes> {
        self.value.as_ref()
    }

    /// Entry creation timestamp in epoch milliseconds.
    pub fn creation_time(&self) -> Option<i64> {
        self.creation_time
    }

    /// Absolute expiration timestamp in epoch milliseconds.
    pub fn expiration_time(&self) -> Option<i64> {
        self.expiration_time
    }

    /// Access count for the entry.
    pub fn hits(&self) -> Option<i64> {
        self.hits
    }

    /// Epoch milliseconds of the entry's last access.
    pub fn last_access_time(&self) -> Option<i64> {
        self.last_access_time
    }

    // wire_* accessors speak the on-wire sentinel convention for callers
    // that still do.

    pub fn wire_creation_time(&self) -> i64 {
        self.creation_time.unwrap_or(UNSET)
    }

    pub fn wire_expiration_time(&self) -> i64 {
        self.expiration_time.unwrap_or(UNSET)
    }

    pub fn wire_hits(&self) -> i64 {
        self.hits.unwrap_or(UNSET)
    }

    pub fn wire_last_access_time(&self) -> i64 {
        self.last_access_time.unwrap_or(UNSET)
    }

    /// Decodes the key into a typed object with the supplied codec.
    ///
    /// `Ok(None)` when the key is absent; codec failures propagate.
    pub fn decoded_key<C: ObjectCodec>(&self, codec: &C) -> Result<Option<C::Object>> {
        self.key.as_ref().map(|data| codec.decode(data)).transpose()
    }

    /// Decodes the value into a typed object with the supplied codec.
    pub fn decoded_value<C: ObjectCodec>(&self, codec: &C) -> Result<Option<C::Object>> {
        self.value
            .as_ref()
            .map(|data| codec.decode(data))
            .transpose()
    }

    pub fn encode(&self, buf: &mut impl BufMut) {
        put_nullable_bytes(buf, self.key.as_ref());
        put_nullable_bytes(buf, self.value.as_ref());
        buf.put_i64(self.wire_creation_time());
        buf.put_i64(self.wire_expiration_time());
        buf.put_i64(self.wire_hits());
        buf.put_i64(self.wire_last_access_time());
    }

    pub fn decode(mut buf: impl Buf) -> Result<Self> {
        let key = get_nullable_bytes(&mut buf)?;
        let value = get_nullable_bytes(&mut buf)?;
        let creation_time = unset_to_none(get_i64(&mut buf)?);
        let expiration_time = unset_to_none(get_i64(&mut buf)?);
        let hits = unset_to_none(get_i64(&mut buf)?);
        let last_access_time = unset_to_none(get_i64(&mut buf)?);

        Ok(Self {
            key,
            value,
            creation_time,
            expiration_time,
            hits,
            last_access_time,
        })
    }
}

// Only the exact sentinel means "unset"; any other negative value is the
// caller's business and round-trips verbatim.
fn unset_to_none(v: i64) -> Option<i64> {
    (v != UNSET).then_some(v)
}

/// Chainable construction for [`MergeEntry`].
#[derive(Debug, Default)]
pub struct MergeEntryBuilder {
    entry: MergeEntry,
}

impl MergeEntryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&mut self, key: Bytes) -> &mut Self {
        self.entry.key = Some(key);
        self
    }

    pub fn value(&mut self, value: Bytes) -> &mut Self {
        self.entry.value = Some(value);
        self
    }

    /// Creation timestamp in epoch milliseconds; [`UNSET`] records "not
    /// provided".
    pub fn creation_time(&mut self, ms: i64) -> &mut Self {
        self.entry.creation_time = unset_to_none(ms);
        self
    }

    pub fn expiration_time(&mut self, ms: i64) -> &mut Self {
        self.entry.expiration_time = unset_to_none(ms);
        self
    }

    pub fn hits(&mut self, hits: i64) -> &mut Self {
        self.entry.hits = unset_to_none(hits);
        self
    }

    pub fn last_access_time(&mut self, ms: i64) -> &mut Self {
        self.entry.last_access_time = unset_to_none(ms);
        self
    }

    pub fn build(&self) -> MergeEntry {
        self.entry.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{DefaultHasher, Hash, Hasher};

    use bytes::Bytes;

    use super::*;
    use crate::error::Error;

    struct Utf8Codec;

    impl ObjectCodec for Utf8Codec {
        type Object = String;

        fn decode(&self, data: &Bytes) -> Result<String> {
            String::from_utf8(data.to_vec()).map_err(|e| Error::Decode(e.to_string()))
        }
    }

    fn sample_entry() -> MergeEntry {
        MergeEntry::builder()
            .key(Bytes::from_static(&[0x01, 0x02]))
            .value(Bytes::from_static(&[0x10]))
            .creation_time(1000)
            .expiration_time(UNSET)
            .hits(5)
            .last_access_time(1050)
            .build()
    }

    fn hash_of(entry: &MergeEntry) -> u64 {
        let mut hasher = DefaultHasher::new();
        entry.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_fresh_entry_is_all_unset() {
        let entry = MergeEntry::builder().build();
        assert_eq!(entry.key_bytes(), None);
        assert_eq!(entry.value_bytes(), None);
        assert_eq!(entry.creation_time(), None);
        assert_eq!(entry.expiration_time(), None);
        assert_eq!(entry.hits(), None);
        assert_eq!(entry.last_access_time(), None);
        assert_eq!(entry.wire_creation_time(), UNSET);
        assert_eq!(entry.wire_expiration_time(), UNSET);
        assert_eq!(entry.wire_hits(), UNSET);
        assert_eq!(entry.wire_last_access_time(), UNSET);
    }

    #[test]
    fn test_known_byte_layout() {
        let mut buf = Vec::new();
        sample_entry().encode(&mut buf);

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x01, 0x00, 0x00, 0x00, 0x02, 0x01, 0x02,              // key
            0x01, 0x00, 0x00, 0x00, 0x01, 0x10,                    // value
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0xe8,        // creation = 1000
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,        // expiration = -1
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05,        // hits = 5
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x1a,        // last access = 1050
        ];
        assert_eq!(buf, expected);

        let decoded = MergeEntry::decode(buf.as_slice()).unwrap();
        assert_eq!(decoded, sample_entry());
    }

    #[test]
    fn test_round_trip() -> anyhow::Result<()> {
        for entry in [
            MergeEntry::builder().build(),
            sample_entry(),
            MergeEntry::builder().key(Bytes::from_static(b"")).build(),
            MergeEntry::builder()
                .creation_time(-7)
                .hits(i64::MAX)
                .last_access_time(i64::MIN)
                .build(),
        ] {
            let mut buf = Vec::new();
            entry.encode(&mut buf);
            let decoded = MergeEntry::decode(buf.as_slice())?;
            assert_eq!(decoded, entry);
            assert_eq!(hash_of(&decoded), hash_of(&entry));
        }
        Ok(())
    }

    #[test]
    fn test_negative_values_other_than_sentinel_survive() {
        let entry = MergeEntry::builder().creation_time(-7).build();
        assert_eq!(entry.creation_time(), Some(-7));

        let mut buf = Vec::new();
        entry.encode(&mut buf);
        let decoded = MergeEntry::decode(buf.as_slice()).unwrap();
        assert_eq!(decoded.creation_time(), Some(-7));
    }

    #[test]
    fn test_equality_and_hash() {
        let a = sample_entry();
        let b = sample_entry();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let c = MergeEntry::builder()
            .key(Bytes::from_static(&[0x01, 0x02]))
            .value(Bytes::from_static(&[0x10]))
            .creation_time(1000)
            .hits(6)
            .last_access_time(1050)
            .build();
        assert_ne!(a, c);
    }

    #[test]
    fn test_absent_differs_from_empty() {
        let absent = MergeEntry::builder().build();
        let empty = MergeEntry::builder().key(Bytes::from_static(b"")).build();
        assert_ne!(absent, empty);

        let mut absent_buf = Vec::new();
        absent.encode(&mut absent_buf);
        let mut empty_buf = Vec::new();
        empty.encode(&mut empty_buf);
        assert_ne!(absent_buf, empty_buf);
    }

    #[test]
    fn test_every_truncation_fails() {
        let mut buf = Vec::new();
        sample_entry().encode(&mut buf);

        for len in 0..buf.len() {
            assert!(
                MergeEntry::decode(&buf[..len]).is_err(),
                "decode succeeded on {len}-byte prefix"
            );
        }
    }

    #[test]
    fn test_decoded_accessors() -> anyhow::Result<()> {
        let entry = MergeEntry::builder()
            .key(Bytes::from_static(b"user:42"))
            .value(Bytes::from_static(b"alice"))
            .build();

        assert_eq!(entry.decoded_key(&Utf8Codec)?, Some("user:42".to_string()));
        assert_eq!(entry.decoded_value(&Utf8Codec)?, Some("alice".to_string()));

        let empty = MergeEntry::builder().build();
        assert_eq!(empty.decoded_key(&Utf8Codec)?, None);

        let garbled = MergeEntry::builder()
            .key(Bytes::from_static(&[0xff, 0xfe]))
            .build();
        assert!(matches!(
            garbled.decoded_key(&Utf8Codec),
            Err(Error::Decode(_))
        ));
        Ok(())
    }
}
