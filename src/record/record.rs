use std::cmp::Ordering as CmpOrdering;

use crate::prelude::*;

/// One attribute entry of a container.
///
/// On disk a record is laid out as
/// `name length (u32) | name (UTF-16BE) | reserved (4 bytes) | type tag (4 bytes) | value`.
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    /// Name of the file or folder the attribute belongs to.
    pub owner: String,
    /// Four bytes carried verbatim between read and write.
    pub reserved: [u8; 4],
    /// Typed attribute value, its variant defines the type tag.
    pub value: Value,
}

impl Debug for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Record(owner={:?}, reserved={:?}, type={}, value_size={})",
            self.owner,
            String::from_utf8_lossy(&self.reserved),
            self.record_type(),
            self.value.serialized_size()
        )
    }
}

impl Record {
    /// Creates new `Record`.
    pub fn new(owner: impl Into<String>, reserved: [u8; 4], value: Value) -> Self {
        Self {
            owner: owner.into(),
            reserved,
            value,
        }
    }

    /// Returns the type tag of the record value.
    #[inline]
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.value.record_type()
    }

    /// Ordering used for tree placement: owner compared case-insensitively as
    /// Finder does, exact owner bytes breaking ties, then type tag bytes.
    #[must_use]
    pub fn key_cmp(&self, other: &Self) -> CmpOrdering {
        let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
        folded(&self.owner)
            .cmp(&folded(&other.owner))
            .then_with(|| self.owner.cmp(&other.owner))
            .then_with(|| self.record_type().tag().cmp(&other.record_type().tag()))
    }

    pub(crate) fn serialized_size(&self) -> usize {
        4 + 2 * self.owner.encode_utf16().count() + 4 + 4 + self.value.serialized_size()
    }

    pub(crate) fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        let name: Vec<u16> = self.owner.encode_utf16().collect();
        buf.put_u32(u32::try_from(name.len())?);
        name.iter().for_each(|u| buf.put_u16(*u));
        buf.put_slice(&self.reserved);
        buf.put_slice(&self.record_type().tag());
        self.value.encode(buf)
    }

    pub(crate) fn decode(buf: &mut impl Buf) -> Result<Self> {
        let truncated = || Error::from(Kind::InvalidDataBlock);
        let name_len = buf.take_u32().ok_or_else(truncated)?;
        let name = buf.take_utf16(name_len as usize).ok_or_else(truncated)?;
        let owner = String::from_utf16(&name).unwrap_or_else(|e| {
            warn!("record owner is not valid UTF-16, replaced: {}", e);
            String::from_utf16_lossy(&name)
        });
        let reserved = buf.take_array().ok_or_else(truncated)?;
        let tag = buf.take_array().ok_or_else(truncated)?;
        let record_type = RecordType::from_tag(tag)?;
        let value = Value::decode(record_type, buf)?;
        trace!("record decoded: {} {}", owner, record_type);
        Ok(Self {
            owner,
            reserved,
            value,
        })
    }
}
