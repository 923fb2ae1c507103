#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

//! # dsstore
//!
//! The `dsstore` crate reads and writes Finder per-directory metadata containers
//! (`.DS_Store` files).
//!
//! A container is a buddy-allocated block store: a 36-byte header points at a
//! root block holding the offset table, the topic table and the free lists. The
//! `DSDB` topic leads to a B-tree of attribute [`Record`]s, sorted by owner
//! file name and type tag.
//!
//! Every read fully decodes the tree into a flat record list, every write
//! rebuilds the container from scratch.
//!
//! # Examples
//!
//! ```no_run
//! use dsstore::{Record, Store, Value};
//!
//! let mut store = Store::new();
//! store.push(Record::new("photo.jpg", *b"cmmt", Value::ustr("holiday")));
//! let bytes = store.to_bytes().unwrap();
//!
//! let restored = Store::from_bytes(&bytes).unwrap();
//! assert_eq!(restored.len(), 1);
//! ```

#[macro_use]
extern crate log;

/// Build information
pub mod build_info;

/// Error types
pub mod error;

/// Helpers to check and rewrite containers on disk
pub mod tools;

mod btree;
mod codec;
mod record;
mod store;

pub use error::{Error, Kind as ErrorKind, Result};
pub use record::{Record, RecordType, Value};
pub use store::{Builder, Store};

mod prelude {
    pub(crate) use crate::{
        btree::{DsdbMeta, Serializer},
        codec::BufExt,
        error::{Error, Kind, Result},
        record::{Record, RecordType, Value},
    };
    pub(crate) use bytes::{Buf, BufMut, Bytes, BytesMut};
    pub(crate) use std::{
        collections::BTreeMap,
        convert::TryFrom,
        fmt::{Debug, Display, Formatter, Result as FmtResult},
        io::Error as IOError,
        path::Path,
    };
}
