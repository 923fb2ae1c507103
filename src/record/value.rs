use crate::prelude::*;

/// Four-character tag selecting how a record value is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordType {
    /// `bool`: one byte, 0 or 1.
    Bool,
    /// `type`: a four-character code.
    Type,
    /// `long`: 32-bit signed integer.
    Long,
    /// `shor`: 16-bit value right-justified in a 4-byte field.
    Short,
    /// `comp`: 64-bit integer.
    Comp,
    /// `dutc`: 64-bit timestamp.
    Dutc,
    /// `blob`: length-prefixed raw bytes.
    Blob,
    /// `ustr`: length-prefixed UTF-16 text.
    Ustr,
}

impl RecordType {
    /// All known tags in on-disk spelling order.
    pub const ALL: [RecordType; 8] = [
        RecordType::Bool,
        RecordType::Type,
        RecordType::Long,
        RecordType::Short,
        RecordType::Comp,
        RecordType::Dutc,
        RecordType::Blob,
        RecordType::Ustr,
    ];

    /// Returns the on-disk tag.
    #[must_use]
    pub const fn tag(self) -> [u8; 4] {
        match self {
            RecordType::Bool => *b"bool",
            RecordType::Type => *b"type",
            RecordType::Long => *b"long",
            RecordType::Short => *b"shor",
            RecordType::Comp => *b"comp",
            RecordType::Dutc => *b"dutc",
            RecordType::Blob => *b"blob",
            RecordType::Ustr => *b"ustr",
        }
    }

    /// Parses an on-disk tag.
    pub fn from_tag(tag: [u8; 4]) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| {
                warn!("unknown record type tag {:?}", String::from_utf8_lossy(&tag));
                Kind::UnknownRecordType.into()
            })
    }

    /// Returns the tag as text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Bool => "bool",
            RecordType::Type => "type",
            RecordType::Long => "long",
            RecordType::Short => "shor",
            RecordType::Comp => "comp",
            RecordType::Dutc => "dutc",
            RecordType::Blob => "blob",
            RecordType::Ustr => "ustr",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Typed attribute value, one variant per on-disk encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `bool`
    Bool(bool),
    /// `type`
    Type([u8; 4]),
    /// `long`
    Long(i32),
    /// `shor`, the whole 4-byte field is kept so that it round-trips.
    Short(u32),
    /// `comp`
    Comp(u64),
    /// `dutc`
    Dutc(u64),
    /// `blob`
    Blob(Bytes),
    /// `ustr`, UTF-16 code units exactly as stored, unpaired surrogates included.
    Ustr(Vec<u16>),
}

impl Value {
    /// Creates a `ustr` value.
    pub fn ustr(s: impl AsRef<str>) -> Self {
        Value::Ustr(s.as_ref().encode_utf16().collect())
    }

    /// Text of a `ustr` value, unpaired surrogates replaced with U+FFFD.
    #[must_use]
    pub fn to_string_lossy(&self) -> Option<String> {
        match self {
            Value::Ustr(units) => Some(String::from_utf16_lossy(units)),
            _ => None,
        }
    }

    /// Stored byte of a `bool` value read as a flag.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Creates a `blob` value.
    pub fn blob(data: impl Into<Bytes>) -> Self {
        Value::Blob(data.into())
    }

    /// Returns the tag this value is encoded with.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            Value::Bool(_) => RecordType::Bool,
            Value::Type(_) => RecordType::Type,
            Value::Long(_) => RecordType::Long,
            Value::Short(_) => RecordType::Short,
            Value::Comp(_) => RecordType::Comp,
            Value::Dutc(_) => RecordType::Dutc,
            Value::Blob(_) => RecordType::Blob,
            Value::Ustr(_) => RecordType::Ustr,
        }
    }

    /// Low 16 bits of a `shor` field.
    #[must_use]
    pub fn as_short(&self) -> Option<i16> {
        match self {
            Value::Short(v) => Some(*v as u16 as i16),
            _ => None,
        }
    }

    /// Builds a value from its tag and the raw bytes as they appear after the
    /// tag on disk, length prefix included for `blob` and `ustr`.
    pub fn from_raw(record_type: RecordType, raw: &[u8]) -> Result<Self> {
        let mut buf = raw;
        let value = Self::decode(record_type, &mut buf)?;
        if buf.has_remaining() {
            return Err(Kind::InvalidDataBlock.into());
        }
        Ok(value)
    }

    /// Serializes the value without its tag.
    pub fn to_raw(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(self.serialized_size());
        self.encode(&mut buf)?;
        Ok(buf.to_vec())
    }

    pub(crate) fn serialized_size(&self) -> usize {
        match self {
            Value::Bool(_) => 1,
            Value::Type(_) | Value::Long(_) | Value::Short(_) => 4,
            Value::Comp(_) | Value::Dutc(_) => 8,
            Value::Blob(data) => 4 + data.len(),
            Value::Ustr(units) => 4 + 2 * units.len(),
        }
    }

    pub(crate) fn decode(record_type: RecordType, buf: &mut impl Buf) -> Result<Self> {
        let truncated = || Error::from(Kind::InvalidDataBlock);
        let value = match record_type {
            RecordType::Bool => match buf.take_u8().ok_or_else(truncated)? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                other => {
                    warn!("bool value byte {:#x} is neither 0 nor 1", other);
                    return Err(truncated());
                }
            },
            RecordType::Type => Value::Type(buf.take_array().ok_or_else(truncated)?),
            RecordType::Long => Value::Long(buf.take_i32().ok_or_else(truncated)?),
            RecordType::Short => Value::Short(buf.take_u32().ok_or_else(truncated)?),
            RecordType::Comp => Value::Comp(buf.take_u64().ok_or_else(truncated)?),
            RecordType::Dutc => Value::Dutc(buf.take_u64().ok_or_else(truncated)?),
            RecordType::Blob => {
                let len = buf.take_u32().ok_or_else(truncated)?;
                let data = buf.take_vec(len as usize).ok_or_else(truncated)?;
                Value::Blob(data.into())
            }
            RecordType::Ustr => {
                let chars = buf.take_u32().ok_or_else(truncated)?;
                let units = buf.take_utf16(chars as usize).ok_or_else(truncated)?;
                Value::Ustr(units)
            }
        };
        Ok(value)
    }

    pub(crate) fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        match self {
            Value::Bool(v) => buf.put_u8(u8::from(*v)),
            Value::Type(code) => buf.put_slice(code),
            Value::Long(v) => buf.put_i32(*v),
            Value::Short(v) => buf.put_u32(*v),
            Value::Comp(v) | Value::Dutc(v) => buf.put_u64(*v),
            Value::Blob(data) => {
                buf.put_u32(u32::try_from(data.len())?);
                buf.put_slice(data);
            }
            Value::Ustr(units) => {
                buf.put_u32(u32::try_from(units.len())?);
                units.iter().for_each(|u| buf.put_u16(*u));
            }
        }
        Ok(())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Long(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::ustr(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v.into())
    }
}
