use super::prelude::*;

/// In-order traversal of the attribute tree of a fully loaded container.
///
/// Descent is bounded twice: by `max_depth`, and by the number of node visits,
/// which can not exceed the offset table length in a well-formed tree. Both
/// limits turn cyclic or shared child pointers into `InvalidDataBlock`.
#[derive(Debug)]
pub(crate) struct TreeReader<'a> {
    file: &'a [u8],
    offsets: &'a OffsetTable,
    max_depth: usize,
    visits_left: usize,
}

impl<'a> TreeReader<'a> {
    pub(crate) fn new(file: &'a [u8], offsets: &'a OffsetTable, max_depth: usize) -> Self {
        Self {
            file,
            offsets,
            max_depth,
            visits_left: offsets.len(),
        }
    }

    /// Follows the `DSDB` topic to the tree metadata and collects every record.
    pub(crate) fn read_dsdb(&mut self, topics: &Topics) -> Result<Vec<Record>> {
        let block_id = topics.get(DSDB_TOPIC).ok_or_else(|| {
            error!("no DSDB topic");
            Error::from(Kind::InvalidDSDBBlock)
        })?;
        let block = self.offsets.block(self.file, block_id).ok_or_else(|| {
            error!("DSDB block {} is missing or out of bounds", block_id);
            Error::from(Kind::InvalidDSDBBlock)
        })?;
        let meta = DsdbMeta::from_raw(block)?;
        let capacity = (meta.records as usize).min(self.file.len() / 13);
        let mut records = Vec::with_capacity(capacity);
        self.read_node(meta.root_node, 0, &mut records)?;
        debug!(
            "{} records read, {} declared in DSDB",
            records.len(),
            meta.records
        );
        Ok(records)
    }

    /// Appends the records of subtree `node` to `out` in key order.
    pub(crate) fn read_node(&mut self, node: u32, depth: usize, out: &mut Vec<Record>) -> Result<()> {
        if depth > self.max_depth || self.visits_left == 0 {
            error!(
                "tree descent stopped at node {}: depth {}, visits left {}",
                node, depth, self.visits_left
            );
            return Err(Kind::InvalidDataBlock.into());
        }
        self.visits_left -= 1;
        let block = self.offsets.block(self.file, node).ok_or_else(|| {
            error!(
                "node {} is out of range ({} blocks) or out of bounds",
                node,
                self.offsets.len()
            );
            Error::from(Kind::InvalidDataBlock)
        })?;
        let (entries, trailing) = Node::from_raw(block)?.into_parts();
        for Entry { child, record } in entries {
            if let Some(child) = child {
                self.read_node(child, depth + 1, out)?;
            }
            out.push(record);
        }
        if let Some(trailing) = trailing {
            self.read_node(trailing, depth + 1, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_bool_record(file: &mut [u8], at: usize, name: u8) {
        let mut buf = &mut file[at..];
        buf.put_u32(1);
        buf.put_u16(name.into());
        buf.put_u32(0);
        buf.put_slice(b"bool");
        buf.put_u8(1);
    }

    /// Node 1 at address 32 holds "A" with leading child 2 and trailing child 2,
    /// node 2 at address 64 is a leaf holding "B".
    fn shared_child_fixture() -> (Vec<u8>, OffsetTable) {
        let mut file = vec![0_u8; 256];
        (&mut file[36..]).put_u32(2);
        (&mut file[40..]).put_u32(1);
        (&mut file[44..]).put_u32(2);
        put_bool_record(&mut file, 48, b'A');
        (&mut file[68..]).put_u32(0);
        (&mut file[72..]).put_u32(1);
        put_bool_record(&mut file, 76, b'B');
        (file, OffsetTable::new(vec![0, 32 + 5, 64 + 5]))
    }

    #[test]
    fn internal_node_visits_children_around_entries() {
        let (file, offsets) = shared_child_fixture();
        let mut records = Vec::new();
        TreeReader::new(&file, &offsets, 32)
            .read_node(1, 0, &mut records)
            .unwrap();
        let owners: Vec<_> = records.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["B", "A", "B"]);
    }

    #[test]
    fn node_id_out_of_range() {
        let (file, _) = shared_child_fixture();
        let offsets = OffsetTable::new(vec![0]);
        let err = TreeReader::new(&file, &offsets, 32)
            .read_node(10, 0, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDataBlock);
    }

    #[test]
    fn node_out_of_bounds() {
        let offsets = OffsetTable::new(vec![0]);
        let err = TreeReader::new(&[1, 2, 3], &offsets, 32)
            .read_node(0, 0, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDataBlock);
    }

    #[test]
    fn depth_is_bounded() {
        let (file, offsets) = shared_child_fixture();
        let err = TreeReader::new(&file, &offsets, 0)
            .read_node(1, 0, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDataBlock);
    }

    #[test]
    fn self_referencing_node_is_rejected() {
        let (mut file, offsets) = shared_child_fixture();
        (&mut file[36..]).put_u32(1);
        (&mut file[44..]).put_u32(1);
        let err = TreeReader::new(&file, &offsets, 1000)
            .read_node(1, 0, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDataBlock);
    }

    #[test]
    fn dsdb_lookup_failures() {
        let offsets = OffsetTable::new(vec![0]);
        let mut reader = TreeReader::new(&[1, 2, 3], &offsets, 32);
        let err = reader.read_dsdb(&Topics::with_dsdb(0)).unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDSDBBlock);
        let err = reader.read_dsdb(&Topics::with_dsdb(10)).unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDSDBBlock);
        let err = reader.read_dsdb(&Topics::default()).unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDSDBBlock);
    }
}
