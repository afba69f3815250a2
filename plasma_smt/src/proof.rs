//! Membership proofs and their wire format.

use ethereum_types::U256;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    bits::Bits,
    config::SmtConfig,
    digest::Digest,
    error::{SmtError, SmtResult},
    utils::combine,
};

/// A leaf index together with the digests of the siblings met on the way from
/// that leaf up to the root.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Proof {
    pub index: U256,
    /// One digest per level, the leaf's sibling first.
    pub siblings: Vec<Digest>,
}

impl Proof {
    /// Folds `leaf_digest` with the siblings along the index's bit path.
    ///
    /// Returns `None` if the proof does not have the shape of a proof for a
    /// tree of this configuration.
    pub fn compute_root(&self, config: &SmtConfig, leaf_digest: Digest) -> Option<Digest> {
        config.validate().ok()?;
        if self.siblings.len() != config.depth
            || leaf_digest.width() != config.digest_width
            || self
                .siblings
                .iter()
                .any(|s| s.width() != config.digest_width)
        {
            return None;
        }

        let mut path = Bits::from_index(self.index, config.depth).ok()?;
        let mut node = leaf_digest;
        for sibling in &self.siblings {
            node = match path.pop_next_bit() {
                false => combine(&node, sibling),
                true => combine(sibling, &node),
            };
        }
        Some(node)
    }

    /// Checks that `leaf` sits at `self.index` in the tree with the given
    /// root.
    pub fn verify(&self, config: &SmtConfig, root: &Digest, leaf: &[u8]) -> bool {
        let Ok(leaf_digest) = config.leaf_digest(leaf) else {
            return false;
        };
        let res = self.compute_root(config, leaf_digest).as_ref() == Some(root);
        trace!("Membership of index {} in {}: {}", self.index, root, res);
        res
    }

    /// Checks that nothing was inserted at `self.index` in the tree with the
    /// given root.
    pub fn verify_empty(&self, config: &SmtConfig, root: &Digest) -> bool {
        self.compute_root(config, Digest::zero(config.digest_width))
            .as_ref()
            == Some(root)
    }

    /// The siblings concatenated from the leaf up, as expected by the root
    /// chain's membership check.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.siblings
            .iter()
            .flat_map(|s| s.as_bytes().iter().copied())
            .collect()
    }

    /// Parses the output of [`Proof::to_bytes`] for a leaf at `index`.
    pub fn from_bytes(config: &SmtConfig, index: U256, bytes: &[u8]) -> SmtResult<Self> {
        config.validate()?;
        Bits::from_index(index, config.depth)?;
        if bytes.len() != config.depth * config.digest_width {
            return Err(SmtError::InvalidProofLength {
                found: bytes.len(),
                depth: config.depth,
                width: config.digest_width,
            });
        }
        let siblings = bytes
            .chunks_exact(config.digest_width)
            .map(Digest::from_slice)
            .collect::<SmtResult<_>>()?;
        Ok(Self { index, siblings })
    }
}

/// Checks that `leaf` sits at `index` in the tree with root `root`.
///
/// Never fails: malformed proofs and configurations simply do not verify.
pub fn verify(config: &SmtConfig, root: &Digest, index: U256, leaf: &[u8], proof: &Proof) -> bool {
    proof.index == index && proof.verify(config, root, leaf)
}
