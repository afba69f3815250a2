use plasma_common::keccak256;

use crate::{config::SmtConfig, digest::Digest};

/// Returns `keccak256(leaf)` truncated to `width` bytes. `width` must already
/// be validated.
pub(crate) fn hash_leaf(leaf: &[u8], width: usize) -> Digest {
    Digest::truncate(keccak256(leaf), width)
}

/// Returns `keccak256(left || right)` truncated to the children's width.
pub fn combine(left: &Digest, right: &Digest) -> Digest {
    debug_assert_eq!(left.width(), right.width());
    let mut buf = Vec::with_capacity(left.width() + right.width());
    buf.extend_from_slice(left.as_bytes());
    buf.extend_from_slice(right.as_bytes());
    Digest::truncate(keccak256(&buf), left.width())
}

/// The digests of empty subtrees, indexed by height: `0` is an empty leaf
/// (all zeros) and every following entry hashes two copies of the previous
/// one. Holds `config.depth + 1` entries, the last one being the root of an
/// empty tree.
pub(crate) fn default_nodes(config: &SmtConfig) -> Vec<Digest> {
    let mut nodes = Vec::with_capacity(config.depth + 1);
    let mut node = Digest::zero(config.digest_width);
    nodes.push(node);
    for _ in 0..config.depth {
        node = combine(&node, &node);
        nodes.push(node);
    }
    nodes
}
