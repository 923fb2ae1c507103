use std::{error, num::TryFromIntError};

use crate::prelude::*;
use thiserror::Error;

/// A specialized container result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for `Store` operations.
#[derive(Debug)]
pub struct Error {
    repr: Repr,
}

impl Error {
    /// Returns the corresponding `Kind` for this error.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match &self.repr {
            Repr::Inner(k) => k.clone(),
            Repr::Io(_) => Kind::Io,
        }
    }

    /// Checks whether this error is of the given kind.
    #[must_use]
    pub fn is(&self, other: &Kind) -> bool {
        match &self.repr {
            Repr::Inner(kind) => kind == other,
            Repr::Io(_) => *other == Kind::Io,
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.repr {
            Repr::Inner(_) => None,
            Repr::Io(e) => Some(e),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.repr {
            Repr::Inner(kind) => Display::fmt(kind, f),
            Repr::Io(e) => Display::fmt(e, f),
        }
    }
}

impl From<Kind> for Error {
    #[must_use]
    fn from(kind: Kind) -> Self {
        Self {
            repr: Repr::Inner(kind),
        }
    }
}

impl From<IOError> for Error {
    #[must_use]
    fn from(e: IOError) -> Self {
        Self { repr: Repr::Io(e) }
    }
}

impl From<TryFromIntError> for Error {
    #[must_use]
    fn from(e: TryFromIntError) -> Self {
        Kind::Conversion(e.to_string()).into()
    }
}

#[derive(Debug)]
enum Repr {
    Inner(Kind),
    Io(IOError),
}

/// A list specifying categories of container error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Kind {
    /// Fewer than 36 header bytes available.
    #[error("invalid file header")]
    InvalidHeader,
    /// Leading alignment word is not `0x00000001`.
    #[error("invalid first magic")]
    InvalidFirstMagic,
    /// Allocator signature is not `Bud1`.
    #[error("invalid second magic")]
    InvalidSecondMagic,
    /// The two copies of the root block offset disagree, usually a torn write.
    #[error("invalid header offset")]
    InvalidHeaderOffset,
    /// Offset table is truncated.
    #[error("invalid offset table")]
    InvalidOffsetTable,
    /// Topic table is truncated or malformed.
    #[error("invalid topic table")]
    InvalidTopicTable,
    /// Free block lists are truncated.
    #[error("invalid free block table")]
    InvalidFreeBlockTable,
    /// Root block lies outside of the container.
    #[error("invalid root block")]
    InvalidRootBlock,
    /// `DSDB` topic is missing, unreadable or its sentinel is corrupted.
    #[error("invalid DSDB block")]
    InvalidDSDBBlock,
    /// B-tree node id is out of range, or the node is unreadable or truncated.
    #[error("invalid data block")]
    InvalidDataBlock,
    /// Record carries a type tag outside of the eight known encodings.
    #[error("unknown record type")]
    UnknownRecordType,
    /// Input configuration is wrong.
    #[error("wrong config")]
    WrongConfig,
    /// Value does not fit into the on-disk integer width.
    #[error("conversion error: {0}")]
    Conversion(String),
    /// Underlying byte source or sink failed, see `source()`.
    #[error("io error")]
    Io,
}
