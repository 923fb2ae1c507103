use super::prelude::*;

/// Block 0 of every container: offset table, topic table and free lists,
/// in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RootBlock {
    pub(crate) offsets: OffsetTable,
    pub(crate) topics: Topics,
    pub(crate) free: FreeLists,
}

impl RootBlock {
    pub(crate) fn new(offsets: OffsetTable, topics: Topics, free: FreeLists) -> Self {
        Self {
            offsets,
            topics,
            free,
        }
    }

    /// Slices the root block out of `file` and parses it.
    pub(crate) fn read(file: &[u8], offset: u32, size: u32) -> Result<Self> {
        let mut block = read_block(file, offset, size.into()).ok_or_else(|| {
            error!("root block {:#x}+{:#x} is out of bounds", offset, size);
            Error::from(Kind::InvalidRootBlock)
        })?;
        Self::from_raw(&mut block)
    }

    pub(crate) fn from_raw(buf: &mut impl Buf) -> Result<Self> {
        let offsets = OffsetTable::from_raw(buf)?;
        let topics = Topics::from_raw(buf)?;
        let free = FreeLists::from_raw(buf)?;
        debug!(
            "root block: {} blocks, {} topics, {} free blocks",
            offsets.len(),
            topics.len(),
            free.len()
        );
        Ok(Self::new(offsets, topics, free))
    }

    pub(crate) fn serialized_size(&self) -> usize {
        self.offsets.serialized_size() + self.topics.serialized_size() + self.free.serialized_size()
    }

    pub(crate) fn to_raw_into(&self, buf: &mut impl BufMut) -> Result<()> {
        self.offsets.to_raw_into(buf)?;
        self.topics.to_raw_into(buf)?;
        self.free.to_raw_into(buf)
    }
}
