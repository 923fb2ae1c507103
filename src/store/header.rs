use super::prelude::*;
use static_assertions::const_assert_eq;

pub(crate) const HEADER_SIZE: usize = 36;
pub(crate) const FIRST_MAGIC: u32 = 0x0000_0001;
pub(crate) const SECOND_MAGIC: [u8; 4] = *b"Bud1";

/// The header, minus its leading alignment word, fills the first allocator block.
pub(crate) const HEADER_BLOCK_SIZE: u32 = 32;
const_assert_eq!(HEADER_SIZE, 4 + HEADER_BLOCK_SIZE as usize);

/// Fixed 36 bytes at the start of a container:
///
/// | bytes  | content                        |
/// |--------|--------------------------------|
/// | 0..4   | `0x00000001`                   |
/// | 4..8   | `Bud1`                         |
/// | 8..12  | root block offset              |
/// | 12..16 | root block size                |
/// | 16..20 | root block offset (unchecked)  |
/// | 20..28 | zero                           |
/// | 28..32 | root block offset (checked)    |
/// | 32..36 | zero                           |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) root_offset: u32,
    pub(crate) root_size: u32,
}

impl Header {
    pub(crate) const fn new(root_offset: u32, root_size: u32) -> Self {
        Self {
            root_offset,
            root_size,
        }
    }

    pub(crate) fn from_raw(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            error!("container is too short for header: {} bytes", buf.len());
            return Err(Kind::InvalidHeader.into());
        }
        let mut buf = &buf[..HEADER_SIZE];
        if buf.get_u32() != FIRST_MAGIC {
            return Err(Kind::InvalidFirstMagic.into());
        }
        let mut magic = [0; 4];
        buf.copy_to_slice(&mut magic);
        if magic != SECOND_MAGIC {
            return Err(Kind::InvalidSecondMagic.into());
        }
        let root_offset = buf.get_u32();
        let root_size = buf.get_u32();
        buf.advance(12);
        let root_offset_copy = buf.get_u32();
        if root_offset != root_offset_copy {
            error!(
                "root offset copies disagree: {:#x} vs {:#x}",
                root_offset, root_offset_copy
            );
            return Err(Kind::InvalidHeaderOffset.into());
        }
        trace!(
            "header: root block at {:#x}, size {:#x}",
            root_offset,
            root_size
        );
        Ok(Self::new(root_offset, root_size))
    }

    pub(crate) fn to_raw_into(&self, buf: &mut impl BufMut) {
        buf.put_u32(FIRST_MAGIC);
        buf.put_slice(&SECOND_MAGIC);
        buf.put_u32(self.root_offset);
        buf.put_u32(self.root_size);
        buf.put_u32(self.root_offset);
        buf.put_bytes(0, 8);
        buf.put_u32(self.root_offset);
        buf.put_bytes(0, 4);
    }
}
