use super::prelude::*;
use super::Store;

/// `Builder` used for initializing a `Store` with non-default settings.
///
/// # Examples
/// ```no_run
/// use dsstore::Builder;
///
/// let store = Builder::new().node_capacity(16).max_depth(8).build().unwrap();
/// assert!(store.is_empty());
/// ```
#[derive(Default, Debug)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Initializes the `Builder` with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates empty `Store` based on given configuration
    /// # Errors
    /// Fails with `WrongConfig` if the node capacity is less than 2 or max
    /// depth is zero.
    pub fn build(self) -> Result<Store> {
        self.config.validate()?;
        Ok(Store::with_config(self.config))
    }

    /// # Description
    /// Sets the maximum number of entries in a written B-tree node.
    /// Smaller nodes give deeper trees.
    #[must_use]
    pub fn node_capacity(mut self, node_capacity: usize) -> Self {
        debug!("set node capacity");
        self.config.set_node_capacity(node_capacity);
        info!("node capacity set to: {}", node_capacity);
        self
    }

    /// # Description
    /// Sets how deep tree descent may go while reading before the container
    /// is rejected as corrupted. Zero is rejected by `build`.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        debug!("set max depth");
        self.config.set_max_depth(max_depth);
        info!("max depth set to: {}", max_depth);
        self
    }
}
