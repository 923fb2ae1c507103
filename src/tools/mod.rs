pub(crate) mod utils;

pub use utils::*;

pub(crate) mod prelude {
    pub(crate) use crate::prelude::*;
    pub(crate) use crate::Store;
    pub(crate) use anyhow::{Context, Result as AnyResult};
}
