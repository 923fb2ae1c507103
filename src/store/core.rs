use std::{
    fs::OpenOptions,
    io::{Read, Write},
};

use super::prelude::*;
use crate::btree::TreeReader;

/// In-memory view of a container: the attribute records in key order.
///
/// Nothing but the records survives a read; allocator, offset and topic state
/// is rebuilt from scratch on every write.
#[derive(Debug, Clone, Default)]
pub struct Store {
    config: Config,
    records: Vec<Record>,
}

impl Store {
    /// Creates an empty store with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_config(config: Config) -> Self {
        Self {
            config,
            records: Vec::new(),
        }
    }

    /// Creates a store holding `records`, default settings.
    #[must_use]
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Records in the order they were read or added.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access to the record list.
    pub fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.records
    }

    /// Consumes the store and returns its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Adds a record.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reads a whole container from `reader` with default settings.
    /// # Errors
    /// Returns the first format violation found, or the reader's I/O error.
    pub fn read(reader: impl Read) -> Result<Self> {
        let mut store = Self::new();
        store.load(reader)?;
        Ok(store)
    }

    /// Decodes a container held in memory with default settings.
    /// # Errors
    /// Returns the first format violation found.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut store = Self::new();
        store.load_bytes(data)?;
        Ok(store)
    }

    /// Reads a container file with default settings.
    /// # Errors
    /// Fails if the file can't be opened or read, or is not a valid container.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new();
        store.load_file(path)?;
        Ok(store)
    }

    /// Replaces the records with the ones read from `reader`.
    /// The store is left untouched on error.
    /// # Errors
    /// Returns the first format violation found, or the reader's I/O error.
    pub fn load(&mut self, mut reader: impl Read) -> Result<()> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.load_bytes(&data)
    }

    /// Replaces the records with the ones decoded from `data`.
    /// The store is left untouched on error.
    /// # Errors
    /// Returns the first format violation found.
    pub fn load_bytes(&mut self, data: &[u8]) -> Result<()> {
        let header = Header::from_raw(data)?;
        let root = RootBlock::read(data, header.root_offset, header.root_size)?;
        let records = TreeReader::new(data, &root.offsets, self.config.max_depth())
            .read_dsdb(&root.topics)?;
        debug!("container of {} bytes loaded: {} records", data.len(), records.len());
        self.records = records;
        Ok(())
    }

    /// Replaces the records with the ones read from the file at `path`.
    /// # Errors
    /// Fails if the file can't be opened or read, or is not a valid container.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            error!("failed to read {}: {}", path.display(), e);
            e
        })?;
        self.load_bytes(&data)
    }

    /// Serializes every record into a freshly laid out container.
    /// # Errors
    /// Fails if a value or the container outgrows the 32-bit fields of the format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let tree = Serializer::new(&self.records, self.config.node_capacity()).tree_stage()?;
        let layout = Layout::new(&tree)?;
        Ok(layout.to_bytes()?.to_vec())
    }

    /// Writes the container to `writer` in a single call, after it was fully
    /// serialized.
    /// # Errors
    /// Serialization errors, or the writer's I/O error.
    pub fn write(&self, mut writer: impl Write) -> Result<()> {
        let data = self.to_bytes()?;
        writer.write_all(&data)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the container to `path`, creating or truncating the file. On unix
    /// a newly created file gets permission bits `mode`.
    /// # Errors
    /// Serialization errors, or failure to create or write the file.
    pub fn write_file(&self, path: impl AsRef<Path>, mode: u32) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        let mut file = options.open(path).map_err(|e| {
            error!("failed to open {} for writing: {}", path.display(), e);
            e
        })?;
        file.write_all(&data)?;
        file.sync_all()?;
        debug!("{} bytes written to {}", data.len(), path.display());
        Ok(())
    }
}
