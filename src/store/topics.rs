use super::prelude::*;

/// Topic naming the block that holds the attribute tree metadata.
pub(crate) const DSDB_TOPIC: &str = "DSDB";

/// Named pointers to logical block ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Topics {
    inner: BTreeMap<String, u32>,
}

impl Topics {
    pub(crate) fn with_dsdb(block_id: u32) -> Self {
        let mut topics = Self::default();
        topics.insert(DSDB_TOPIC, block_id);
        topics
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, block_id: u32) -> Option<u32> {
        self.inner.insert(name.into(), block_id)
    }

    pub(crate) fn get(&self, name: &str) -> Option<u32> {
        self.inner.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    pub(crate) fn from_raw(buf: &mut impl Buf) -> Result<Self> {
        let count = buf.take_u32().ok_or(Kind::InvalidTopicTable)?;
        let mut topics = Self::default();
        for _ in 0..count {
            let len = buf.take_u8().ok_or(Kind::InvalidTopicTable)?;
            let name = buf
                .take_vec(len.into())
                .ok_or(Kind::InvalidTopicTable)?;
            let name = String::from_utf8(name).map_err(|e| {
                warn!("topic name is not valid UTF-8: {}", e);
                Kind::InvalidTopicTable
            })?;
            let block_id = buf.take_u32().ok_or(Kind::InvalidTopicTable)?;
            trace!("topic {:?} -> block {}", name, block_id);
            topics.insert(name, block_id);
        }
        Ok(topics)
    }

    pub(crate) fn serialized_size(&self) -> usize {
        4 + self.inner.keys().map(|name| 1 + name.len() + 4).sum::<usize>()
    }

    pub(crate) fn to_raw_into(&self, buf: &mut impl BufMut) -> Result<()> {
        buf.put_u32(u32::try_from(self.inner.len())?);
        for (name, block_id) in &self.inner {
            buf.put_u8(u8::try_from(name.len())?);
            buf.put_slice(name.as_bytes());
            buf.put_u32(*block_id);
        }
        Ok(())
    }
}
