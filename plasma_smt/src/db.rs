use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{bits::Bits, digest::Digest};

/// Storage for the non-default nodes of a tree, addressed by their path from
/// the root.
pub trait Db: Default {
    fn get_node(&self, key: &Bits) -> Option<&Digest>;
    fn set_node(&mut self, key: Bits, value: Digest);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryDb {
    pub db: HashMap<Bits, Digest>,
}

impl Db for MemoryDb {
    fn get_node(&self, key: &Bits) -> Option<&Digest> {
        self.db.get(key)
    }

    fn set_node(&mut self, key: Bits, value: Digest) {
        self.db.insert(key, value);
    }

    fn len(&self) -> usize {
        self.db.len()
    }
}
