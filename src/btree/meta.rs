use super::prelude::*;

/// Fixed page size value stored in every `DSDB` block. Nothing else reads it,
/// a different value means the block is corrupted.
pub(crate) const PAGE_SIZE_SENTINEL: u32 = 0x0000_1000;

/// Contents of the block the `DSDB` topic points at.
///
/// Node and record counts are carried as written and never checked against
/// the actual tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DsdbMeta {
    pub(crate) root_node: u32,
    pub(crate) levels: u32,
    pub(crate) records: u32,
    pub(crate) nodes: u32,
}

impl DsdbMeta {
    pub(crate) const SERIALIZED_SIZE: usize = 20;

    pub(crate) fn new(root_node: u32, levels: u32, records: u32, nodes: u32) -> Self {
        Self {
            root_node,
            levels,
            records,
            nodes,
        }
    }

    pub(crate) fn from_raw(mut buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SERIALIZED_SIZE {
            error!("DSDB block is too short: {} bytes", buf.len());
            return Err(Kind::InvalidDSDBBlock.into());
        }
        let meta = Self::new(buf.get_u32(), buf.get_u32(), buf.get_u32(), buf.get_u32());
        let sentinel = buf.get_u32();
        if sentinel != PAGE_SIZE_SENTINEL {
            error!("DSDB sentinel mismatch: {:#010x}", sentinel);
            return Err(Kind::InvalidDSDBBlock.into());
        }
        trace!("{:?}", meta);
        Ok(meta)
    }

    pub(crate) fn to_raw_into(&self, buf: &mut impl BufMut) {
        buf.put_u32(self.root_node);
        buf.put_u32(self.levels);
        buf.put_u32(self.records);
        buf.put_u32(self.nodes);
        buf.put_u32(PAGE_SIZE_SENTINEL);
    }
}
