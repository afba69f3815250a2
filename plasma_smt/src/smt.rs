use std::collections::HashMap;

use ethereum_types::U256;
use log::{debug, trace};

use crate::{
    bits::Bits,
    config::SmtConfig,
    db::Db,
    digest::Digest,
    error::{SmtError, SmtResult},
    proof::Proof,
    utils::{combine, default_nodes},
};

/// Sparse Merkle tree (SMT).
///
/// Built in one go from a set of `(index, leaf)` pairs and immutable
/// afterwards. Every inserted leaf sits at the position spelled by its index
/// over `config.depth` bits; all other positions hold the zero digest.
/// Internal nodes hash the concatenation of their children's digests
/// (left || right), truncated to the configured width.
///
/// Only nodes on the path of at least one inserted leaf are stored in the
/// [`Db`]; every other node is the default node of its height.
#[derive(Debug, Clone)]
pub struct Smt<D: Db> {
    pub db: D,
    pub kv_store: HashMap<U256, Vec<u8>>,
    config: SmtConfig,
    defaults: Vec<Digest>,
    root: Digest,
}

impl<D: Db> Smt<D> {
    /// Builds the tree holding `leaves`.
    ///
    /// Fails if the configuration is invalid, if an index does not fit in the
    /// tree's depth or if the same index is given twice.
    pub fn new<I, L>(config: SmtConfig, leaves: I) -> SmtResult<Self>
    where
        I: IntoIterator<Item = (U256, L)>,
        L: Into<Vec<u8>>,
    {
        config.validate()?;
        let defaults = default_nodes(&config);

        let mut kv_store = HashMap::new();
        let mut level = HashMap::new();
        for (index, leaf) in leaves {
            let path = Bits::from_index(index, config.depth)?;
            if kv_store.contains_key(&index) {
                return Err(SmtError::DuplicateIndex(index));
            }
            let leaf = leaf.into();
            level.insert(path, config.leaf_digest(&leaf)?);
            kv_store.insert(index, leaf);
        }
        debug!(
            "Building a tree of depth {} over {} leaves",
            config.depth,
            kv_store.len()
        );

        let mut db = D::default();
        for height in 0..config.depth {
            trace!(
                "Hashing {} non-default nodes at height {}",
                level.len(),
                height
            );
            let mut parents = HashMap::with_capacity(level.len());
            for (&path, &digest) in &level {
                db.set_node(path, digest);
                let parent = path.parent();
                if parents.contains_key(&parent) {
                    continue;
                }
                let sibling = level
                    .get(&path.sibling())
                    .copied()
                    .unwrap_or(defaults[height]);
                let node = match path.packed.bit(0) {
                    false => combine(&digest, &sibling),
                    true => combine(&sibling, &digest),
                };
                parents.insert(parent, node);
            }
            level = parents;
        }

        let root = match level.remove(&Bits::empty()) {
            Some(root) => {
                db.set_node(Bits::empty(), root);
                root
            }
            None => defaults[config.depth],
        };

        Ok(Self {
            db,
            kv_store,
            config,
            defaults,
            root,
        })
    }

    /// The tree without any leaf.
    pub fn empty(config: SmtConfig) -> SmtResult<Self> {
        Self::new(config, std::iter::empty::<(U256, Vec<u8>)>())
    }

    pub fn root(&self) -> Digest {
        self.root
    }

    pub const fn config(&self) -> &SmtConfig {
        &self.config
    }

    /// The leaf stored at `index`, if any.
    pub fn get(&self, index: U256) -> Option<&[u8]> {
        self.kv_store.get(&index).map(Vec::as_slice)
    }

    /// Number of inserted leaves.
    pub fn len(&self) -> usize {
        self.kv_store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kv_store.is_empty()
    }

    /// The digest of the node at `path`, `height` levels above the leaves.
    fn node(&self, path: &Bits, height: usize) -> Digest {
        self.db
            .get_node(path)
            .copied()
            .unwrap_or(self.defaults[height])
    }

    /// The siblings along the path of `index`, from the leaf up to the root.
    ///
    /// Indices that hold no leaf can be proven too; such a proof passes
    /// [`Proof::verify_empty`].
    pub fn prove(&self, index: U256) -> SmtResult<Proof> {
        let mut path = Bits::from_index(index, self.config.depth)?;
        let mut siblings = Vec::with_capacity(self.config.depth);
        for height in 0..self.config.depth {
            siblings.push(self.node(&path.sibling(), height));
            path.pop_next_bit();
        }
        Ok(Proof { index, siblings })
    }
}
