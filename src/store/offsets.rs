use super::prelude::*;

/// The entry array is padded with zero slots to a multiple of this.
pub(crate) const OFFSET_TABLE_PAGE: u64 = 256;

/// Returns the `size` bytes of block content at allocator address `offset`.
///
/// Allocator addresses start after the leading 4-byte word of the file, so the
/// block lives at `offset + 4`. `None` if the block does not fit into `file`.
pub(crate) fn read_block(file: &[u8], offset: u32, size: u64) -> Option<&[u8]> {
    let start = (offset as usize).checked_add(4)?;
    let end = start.checked_add(usize::try_from(size).ok()?)?;
    let block = file.get(start..end);
    if block.is_none() {
        debug!(
            "block {:#x}+{:#x} is out of container bounds ({} bytes)",
            offset,
            size,
            file.len()
        );
    }
    block
}

/// Maps logical block ids to their encoded physical addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct OffsetTable {
    entries: Vec<u32>,
}

impl OffsetTable {
    pub(crate) fn new(entries: Vec<u32>) -> Self {
        Self { entries }
    }

    pub(crate) fn from_addresses(addresses: &[BlockAddress]) -> Self {
        Self::new(addresses.iter().map(BlockAddress::encoded).collect())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub(crate) fn get(&self, id: u32) -> Option<BlockAddress> {
        self.entries
            .get(id as usize)
            .copied()
            .map(BlockAddress::from_encoded)
    }

    /// Content of block `id`, `None` if the id is unknown or the block is out of bounds.
    pub(crate) fn block<'a>(&self, file: &'a [u8], id: u32) -> Option<&'a [u8]> {
        let address = self.get(id)?;
        read_block(file, address.offset, address.size)
    }

    /// Zero slots mark unused ids and are dropped, later ids shift down.
    pub(crate) fn from_raw(buf: &mut impl Buf) -> Result<Self> {
        let count = buf.take_u32().ok_or(Kind::InvalidOffsetTable)?;
        let _reserved = buf.take_u32().ok_or(Kind::InvalidOffsetTable)?;
        let slots = padded_slots(u64::from(count));
        let mut entries = Vec::with_capacity(count.min(u32::from(u16::MAX)) as usize);
        for _ in 0..slots {
            match buf.take_u32() {
                Some(0) => continue,
                Some(entry) => entries.push(entry),
                None => break,
            }
        }
        trace!("offset table: {} declared, {} read", count, entries.len());
        Ok(Self { entries })
    }

    pub(crate) fn serialized_size(&self) -> usize {
        8 + 4 * padded_slots(self.entries.len() as u64) as usize
    }

    pub(crate) fn to_raw_into(&self, buf: &mut impl BufMut) -> Result<()> {
        buf.put_u32(u32::try_from(self.entries.len())?);
        buf.put_u32(0);
        self.entries.iter().for_each(|&entry| buf.put_u32(entry));
        let padding = padded_slots(self.entries.len() as u64) as usize - self.entries.len();
        buf.put_bytes(0, 4 * padding);
        Ok(())
    }
}

fn padded_slots(count: u64) -> u64 {
    (count + OFFSET_TABLE_PAGE - 1) / OFFSET_TABLE_PAGE * OFFSET_TABLE_PAGE
}
