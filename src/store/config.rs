use super::prelude::*;

pub(crate) const DEFAULT_NODE_CAPACITY: usize = 64;
pub(crate) const DEFAULT_MAX_DEPTH: usize = 32;
pub(crate) const MIN_NODE_CAPACITY: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    node_capacity: usize,
    max_depth: usize,
}

// Getters
impl Config {
    #[inline]
    pub const fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    #[inline]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}

//Setters
impl Config {
    pub fn set_node_capacity(&mut self, node_capacity: usize) {
        self.node_capacity = node_capacity;
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }
}

impl Config {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.node_capacity < MIN_NODE_CAPACITY {
            error!(
                "node capacity {} is less than {}",
                self.node_capacity, MIN_NODE_CAPACITY
            );
            return Err(Kind::WrongConfig.into());
        }
        if self.max_depth == 0 {
            error!("zero max depth allows only a single leaf");
            return Err(Kind::WrongConfig.into());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_capacity: DEFAULT_NODE_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
