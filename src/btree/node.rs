use std::borrow::Borrow;

use super::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Entry<R> {
    /// Subtree with keys less than `record`, internal nodes only.
    pub(super) child: Option<u32>,
    pub(super) record: R,
}

/// B-tree node as stored on disk:
/// `trailing child (0 for leaves) | entry count | entries`,
/// where each entry of an internal node is prefixed by its child id.
///
/// Reading produces `Node<Record>`, writing borrows the caller's records
/// through `Node<&Record>`.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Node<R = Record> {
    trailing: Option<u32>,
    entries: Vec<Entry<R>>,
}

impl<R> Node<R> {
    pub(super) fn leaf(records: Vec<R>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| Entry {
                child: None,
                record,
            })
            .collect();
        Self {
            trailing: None,
            entries,
        }
    }

    /// `children` holds one more id than `records`, the last one becomes the
    /// trailing child. Child ids are never 0, that value marks a leaf.
    pub(super) fn internal(records: Vec<R>, mut children: Vec<u32>) -> Self {
        debug_assert_eq!(records.len() + 1, children.len());
        debug_assert!(children.iter().all(|&c| c != 0));
        let trailing = children.pop();
        let entries = records
            .into_iter()
            .zip(children)
            .map(|(record, child)| Entry {
                child: Some(child),
                record,
            })
            .collect();
        Self { trailing, entries }
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.trailing.is_none()
    }

    #[cfg(test)]
    pub(super) fn trailing(&self) -> Option<u32> {
        self.trailing
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn into_parts(self) -> (Vec<Entry<R>>, Option<u32>) {
        (self.entries, self.trailing)
    }
}

impl<R: Borrow<Record>> Node<R> {
    pub(super) fn serialized_size(&self) -> usize {
        let child_size = if self.is_leaf() { 0 } else { 4 };
        8 + self
            .entries
            .iter()
            .map(|e| child_size + e.record.borrow().serialized_size())
            .sum::<usize>()
    }

    pub(super) fn to_raw_into(&self, buf: &mut impl BufMut) -> Result<()> {
        buf.put_u32(self.trailing.unwrap_or(0));
        buf.put_u32(u32::try_from(self.entries.len())?);
        for entry in &self.entries {
            if let Some(child) = entry.child {
                buf.put_u32(child);
            }
            entry.record.borrow().encode(buf)?;
        }
        Ok(())
    }
}

impl Node {
    pub(super) fn from_raw(mut buf: &[u8]) -> Result<Self> {
        let truncated = || Error::from(Kind::InvalidDataBlock);
        let trailing = buf.take_u32().ok_or_else(truncated)?;
        let count = buf.take_u32().ok_or_else(truncated)?;
        let trailing = (trailing != 0).then(|| trailing);
        // smallest possible entry is a 1-byte bool record with an empty name
        let mut entries = Vec::with_capacity((count as usize).min(buf.len() / 13));
        for _ in 0..count {
            let child = match trailing {
                Some(_) => Some(buf.take_u32().ok_or_else(truncated)?),
                None => None,
            };
            let record = Record::decode(&mut buf)?;
            entries.push(Entry { child, record });
        }
        Ok(Self { trailing, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str) -> Record {
        Record::new(owner, [0; 4], Value::Bool(true))
    }

    #[test]
    fn leaf_layout() {
        let node = Node::leaf(vec![record("B")]);
        let mut buf = Vec::new();
        node.to_raw_into(&mut buf).unwrap();
        assert_eq!(&buf[..8], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(buf.len(), node.serialized_size());
        assert_eq!(Node::from_raw(&buf).unwrap(), node);
    }

    #[test]
    fn internal_layout() {
        let node = Node::internal(vec![record("A"), record("C")], vec![3, 4, 5]);
        let mut buf = Vec::new();
        node.to_raw_into(&mut buf).unwrap();
        assert_eq!(&buf[..12], &[0, 0, 0, 5, 0, 0, 0, 2, 0, 0, 0, 3]);
        assert_eq!(buf.len(), node.serialized_size());
        let parsed = Node::from_raw(&buf).unwrap();
        assert!(!parsed.is_leaf());
        assert_eq!(parsed.trailing(), Some(5));
        assert_eq!(parsed, node);
    }

    #[test]
    fn borrowed_records_encode_like_owned() {
        let records = vec![record("x"), record("y")];
        let owned = Node::leaf(records.clone());
        let borrowed = Node::leaf(records.iter().collect());
        let (mut a, mut b) = (Vec::new(), Vec::new());
        owned.to_raw_into(&mut a).unwrap();
        borrowed.to_raw_into(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn truncated_node() {
        let err = Node::from_raw(&[0, 0, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDataBlock);
        let err = Node::from_raw(&[0, 0, 0, 0, 0, 0, 0, 1]).unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidDataBlock);
    }
}
