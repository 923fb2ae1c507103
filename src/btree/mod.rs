use crate::prelude::*;

mod meta;
mod node;
mod reader;
mod serializer;

pub(crate) use self::{
    meta::DsdbMeta,
    reader::TreeReader,
    serializer::{Serializer, Tree, DSDB_BLOCK_ID},
};

mod prelude {
    pub(super) use super::*;
    pub(super) use crate::store::{OffsetTable, Topics, DSDB_TOPIC};
    pub(super) use node::{Entry, Node};
}
