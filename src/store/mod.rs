mod allocator;
mod builder;
mod config;
mod core;
mod header;
mod layout;
mod offsets;
mod root;
mod topics;

pub use self::{builder::Builder, core::Store};
pub(crate) use self::{
    offsets::OffsetTable,
    topics::{Topics, DSDB_TOPIC},
};

mod prelude {
    pub(crate) use {
        super::{
            allocator::{write_align_block, Allocator, BlockAddress, FreeBlock, FreeLists},
            config::Config,
            header::{Header, HEADER_SIZE},
            layout::Layout,
            offsets::{read_block, OffsetTable},
            root::RootBlock,
            topics::Topics,
        },
        crate::prelude::*,
    };
}
