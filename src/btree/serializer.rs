use super::prelude::*;

/// Block 0 is the root block, block 1 the `DSDB` metadata, nodes follow.
pub(crate) const DSDB_BLOCK_ID: u32 = 1;
pub(crate) const FIRST_NODE_ID: u32 = 2;

/// Attribute tree ready for layout: nodes in block id order starting at
/// `FIRST_NODE_ID`, and the metadata for the `DSDB` block.
#[derive(Debug)]
pub(crate) struct Tree<'a> {
    nodes: Vec<Node<&'a Record>>,
    meta: DsdbMeta,
}

impl<'a> Tree<'a> {
    pub(crate) fn meta(&self) -> &DsdbMeta {
        &self.meta
    }

    pub(crate) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Serialized node bodies in block id order.
    pub(crate) fn node_blocks(&self) -> Result<Vec<BytesMut>> {
        self.nodes
            .iter()
            .map(|node| {
                let mut buf = BytesMut::with_capacity(node.serialized_size());
                node.to_raw_into(&mut buf)?;
                Ok(buf)
            })
            .collect()
    }
}

/// Builds a balanced tree bottom-up from the record set.
///
/// Each level is split into nodes of at most `node_capacity` entries, filled
/// evenly, with one record promoted between each pair of siblings. The
/// promoted records and the new node ids form the next level, until a level
/// fits into a single node.
#[derive(Debug)]
pub(crate) struct Serializer<'a> {
    records: Vec<&'a Record>,
    node_capacity: usize,
}

impl<'a> Serializer<'a> {
    pub(crate) fn new(records: &'a [Record], node_capacity: usize) -> Self {
        let mut records: Vec<&Record> = records.iter().collect();
        records.sort_by(|a, b| a.key_cmp(b));
        Self {
            records,
            node_capacity: node_capacity.max(2),
        }
    }

    pub(crate) fn tree_stage(self) -> Result<Tree<'a>> {
        let records_count = u32::try_from(self.records.len())?;
        let capacity = self.node_capacity;
        let mut nodes = Vec::new();
        let mut keys = self.records;
        let mut children: Option<Vec<u32>> = None;
        let mut levels = 0;
        let root_node = loop {
            if keys.len() <= capacity {
                break Self::push_node(&mut nodes, keys, children)?;
            }
            let sizes = Self::split_sizes(keys.len(), capacity);
            let mut next_keys = Vec::with_capacity(sizes.len() - 1);
            let mut next_children = Vec::with_capacity(sizes.len());
            let mut keys_iter = keys.into_iter();
            let mut children_iter = children.map(Vec::into_iter);
            for (i, &size) in sizes.iter().enumerate() {
                let node_keys: Vec<_> = keys_iter.by_ref().take(size).collect();
                let node_children = children_iter
                    .as_mut()
                    .map(|it| it.by_ref().take(size + 1).collect());
                next_children.push(Self::push_node(&mut nodes, node_keys, node_children)?);
                if i + 1 < sizes.len() {
                    next_keys.extend(keys_iter.next());
                }
            }
            trace!(
                "level {}: {} nodes, {} records promoted",
                levels,
                sizes.len(),
                next_keys.len()
            );
            keys = next_keys;
            children = Some(next_children);
            levels += 1;
        };
        let meta = DsdbMeta::new(
            root_node,
            levels,
            records_count,
            u32::try_from(nodes.len())?,
        );
        debug!(
            "tree built: {} records, {} nodes, {} levels",
            records_count,
            nodes.len(),
            levels
        );
        Ok(Tree { nodes, meta })
    }

    fn push_node(
        nodes: &mut Vec<Node<&'a Record>>,
        keys: Vec<&'a Record>,
        children: Option<Vec<u32>>,
    ) -> Result<u32> {
        let id = FIRST_NODE_ID + u32::try_from(nodes.len())?;
        let node = match children {
            Some(children) => Node::internal(keys, children),
            None => Node::leaf(keys),
        };
        nodes.push(node);
        Ok(id)
    }

    /// Entry counts of the nodes `count` entries are split into, one entry
    /// between neighbours goes up a level. Requires `count > capacity >= 2`.
    fn split_sizes(count: usize, capacity: usize) -> Vec<usize> {
        let nodes = (count + 1 + capacity) / (capacity + 1);
        let kept = count - (nodes - 1);
        let (base, extra) = (kept / nodes, kept % nodes);
        (0..nodes).map(|i| base + usize::from(i < extra)).collect()
    }
}
