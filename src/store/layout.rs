use super::{header::FIRST_MAGIC, prelude::*};
use crate::btree::{Tree, DSDB_BLOCK_ID};

/// Physical placement of every block of a container being written.
///
/// Block 0 (root) is allocated first so the header stays small, but its size
/// depends on the free lists produced by the rest of the layout. The layout is
/// therefore redone with a larger root until the root block fits its own class.
#[derive(Debug)]
pub(crate) struct Layout {
    root: RootBlock,
    addresses: Vec<BlockAddress>,
    blocks: Vec<BytesMut>,
    end: u64,
}

impl Layout {
    pub(crate) fn new(tree: &Tree<'_>) -> Result<Self> {
        let mut dsdb = BytesMut::with_capacity(DsdbMeta::SERIALIZED_SIZE);
        tree.meta().to_raw_into(&mut dsdb);
        let mut blocks = Vec::with_capacity(tree.nodes_count() + 1);
        blocks.push(dsdb);
        blocks.extend(tree.node_blocks()?);

        let mut root_size = 0;
        loop {
            let mut allocator = Allocator::new();
            let mut addresses = Vec::with_capacity(blocks.len() + 1);
            addresses.push(allocator.allocate(root_size)?);
            for block in &blocks {
                addresses.push(allocator.allocate(block.len())?);
            }
            let root = RootBlock::new(
                OffsetTable::from_addresses(&addresses),
                Topics::with_dsdb(DSDB_BLOCK_ID),
                allocator.free_lists().clone(),
            );
            let needed = root.serialized_size();
            if needed as u64 <= addresses[0].size {
                debug!(
                    "layout: root block {:#x} bytes, {} blocks, {} free, ends at {:#x}",
                    addresses[0].size,
                    addresses.len(),
                    root.free.len(),
                    allocator.end()
                );
                return Ok(Self {
                    root,
                    addresses,
                    blocks,
                    end: allocator.end(),
                });
            }
            trace!(
                "root block needs {:#x} bytes, {:#x} allocated, retrying",
                needed,
                addresses[0].size
            );
            root_size = needed;
        }
    }

    pub(crate) fn header(&self) -> Result<Header> {
        let root = self.addresses[0];
        Ok(Header::new(root.offset, u32::try_from(root.size)?))
    }

    /// Serializes the whole container: header, then every block at its address,
    /// each padded to its full size.
    pub(crate) fn to_bytes(&self) -> Result<BytesMut> {
        let mut root = BytesMut::with_capacity(self.root.serialized_size());
        self.root.to_raw_into(&mut root)?;

        // Allocator space starts at file position 4; the 32-byte header block is
        // reserved here and replaced by the real header below.
        let mut space = BytesMut::with_capacity(usize::try_from(self.end)?);
        space.put_bytes(0, HEADER_SIZE - 4);
        for (address, block) in self.addresses.iter().zip(std::iter::once(&root).chain(&self.blocks)) {
            let size = usize::try_from(address.size)?;
            write_align_block(&mut space, size);
            debug_assert_eq!(space.len() as u64, u64::from(address.offset));
            space.extend_from_slice(block);
            write_align_block(&mut space, size);
        }

        let mut file = BytesMut::with_capacity(4 + space.len());
        self.header()?.to_raw_into(&mut file);
        debug_assert_eq!(&file[..4], &FIRST_MAGIC.to_be_bytes());
        file.extend_from_slice(&space[HEADER_SIZE - 4..]);
        Ok(file)
    }
}
