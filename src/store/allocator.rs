use super::{header::HEADER_BLOCK_SIZE, prelude::*};

/// Number of free list size classes, class `i` holds blocks of `2^i` bytes.
pub(crate) const FREE_LIST_CLASSES: usize = 32;
/// Smallest block the allocator hands out, also the address granularity.
pub(crate) const MIN_BLOCK_SIZE: u64 = 32;

const SIZE_CLASS_MASK: u32 = 0x1f;
const MAX_BLOCK_SIZE: u64 = 1 << 31;
const ADDRESS_SPACE: u64 = 1 << 32;

/// Physical placement of a block: address relative to file position 4 and a
/// power of two size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockAddress {
    pub(crate) offset: u32,
    pub(crate) size: u64,
}

impl BlockAddress {
    /// Offset table entries keep `log2(size)` in the low five bits.
    pub(crate) fn from_encoded(entry: u32) -> Self {
        Self {
            offset: entry & !SIZE_CLASS_MASK,
            size: 1 << (entry & SIZE_CLASS_MASK),
        }
    }

    pub(crate) fn encoded(&self) -> u32 {
        self.offset | self.size.trailing_zeros()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FreeBlock {
    pub(crate) offset: u32,
    pub(crate) size: u64,
}

impl FreeBlock {
    pub(crate) const fn new(offset: u32, size: u64) -> Self {
        Self { offset, size }
    }
}

/// Free blocks bucketed by size class. Serialized as 32 `count, offsets...`
/// groups, empty classes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FreeLists {
    classes: [Vec<u32>; FREE_LIST_CLASSES],
}

impl Default for FreeLists {
    fn default() -> Self {
        Self {
            classes: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl FreeLists {
    pub(crate) fn from_blocks(blocks: impl IntoIterator<Item = FreeBlock>) -> Self {
        let mut lists = Self::default();
        blocks.into_iter().for_each(|b| lists.push(b));
        lists
    }

    /// `size` must be a power of two below `2^32`.
    pub(crate) fn push(&mut self, block: FreeBlock) {
        debug_assert!(block.size.is_power_of_two());
        let class = block.size.trailing_zeros() as usize;
        self.classes[class].push(block.offset);
    }

    pub(crate) fn len(&self) -> usize {
        self.classes.iter().map(Vec::len).sum()
    }

    pub(crate) fn blocks(&self) -> impl Iterator<Item = FreeBlock> + '_ {
        self.classes.iter().enumerate().flat_map(|(class, offsets)| {
            offsets
                .iter()
                .map(move |&offset| FreeBlock::new(offset, 1 << class))
        })
    }

    pub(crate) fn serialized_size(&self) -> usize {
        4 * (FREE_LIST_CLASSES + self.len())
    }

    pub(crate) fn from_raw(buf: &mut impl Buf) -> Result<Self> {
        let mut lists = Self::default();
        for (class, offsets) in lists.classes.iter_mut().enumerate() {
            let count = buf.take_u32().ok_or(Kind::InvalidFreeBlockTable)? as usize;
            if buf.remaining() / 4 < count {
                error!(
                    "free list class {} declares {} blocks, only {} bytes left",
                    class,
                    count,
                    buf.remaining()
                );
                return Err(Kind::InvalidFreeBlockTable.into());
            }
            offsets.extend((0..count).map(|_| buf.get_u32()));
        }
        trace!("{} free blocks read", lists.len());
        Ok(lists)
    }

    pub(crate) fn to_raw_into(&self, buf: &mut impl BufMut) -> Result<()> {
        for offsets in &self.classes {
            buf.put_u32(u32::try_from(offsets.len())?);
            offsets.iter().for_each(|&offset| buf.put_u32(offset));
        }
        Ok(())
    }
}

/// Pads `buf` with zeros up to the next multiple of `alignment`.
pub(crate) fn write_align_block(buf: &mut BytesMut, alignment: usize) {
    if alignment == 0 {
        return;
    }
    let rem = buf.len() % alignment;
    if rem != 0 {
        buf.put_bytes(0, alignment - rem);
    }
}

/// Bump allocator with buddy alignment: every block is sized to a power of two
/// and placed at an address aligned to its own size. Space skipped to reach
/// alignment is recorded as free blocks.
#[derive(Debug)]
pub(crate) struct Allocator {
    cursor: u64,
    free: FreeLists,
}

impl Allocator {
    pub(crate) fn new() -> Self {
        Self {
            cursor: u64::from(HEADER_BLOCK_SIZE),
            free: FreeLists::default(),
        }
    }

    pub(crate) fn allocate(&mut self, len: usize) -> Result<BlockAddress> {
        let size = (len as u64).max(MIN_BLOCK_SIZE).next_power_of_two();
        if size > MAX_BLOCK_SIZE {
            return Err(Kind::Conversion(format!("block of {} bytes is too large", len)).into());
        }
        let offset = (self.cursor + size - 1) / size * size;
        if offset + size > ADDRESS_SPACE {
            return Err(Kind::Conversion(format!(
                "block at {:#x} exceeds 32-bit address space",
                offset
            ))
            .into());
        }
        self.release(self.cursor, offset)?;
        self.cursor = offset + size;
        trace!("allocated {:#x} bytes at {:#x}", size, offset);
        Ok(BlockAddress {
            offset: u32::try_from(offset)?,
            size,
        })
    }

    /// First address past the last allocated block.
    pub(crate) fn end(&self) -> u64 {
        self.cursor
    }

    pub(crate) fn free_lists(&self) -> &FreeLists {
        &self.free
    }

    fn release(&mut self, mut start: u64, end: u64) -> Result<()> {
        while start < end {
            let mut size = 1_u64 << start.trailing_zeros();
            while start + size > end {
                size >>= 1;
            }
            self.free.push(FreeBlock::new(u32::try_from(start)?, size));
            start += size;
        }
        Ok(())
    }
}
