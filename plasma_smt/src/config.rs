use serde::{Deserialize, Serialize};

use crate::{
    digest::{check_width, Digest},
    error::{SmtError, SmtResult},
    utils::hash_leaf,
};

/// Deepest tree addressable by a 256-bit leaf index.
pub const MAX_DEPTH: usize = 256;

/// Shape of a sparse Merkle tree: how wide its digests are and how many levels
/// it has.
///
/// The default is the configuration used against the root chain: one-byte
/// digests and one level per digest bit (depth 8). When deserialized, a
/// missing `depth` follows `digest_width` as in [`SmtConfig::new`], and the
/// result is validated.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "RawSmtConfig")]
pub struct SmtConfig {
    /// Number of leading Keccak-256 bytes kept for every node.
    pub digest_width: usize,
    /// Number of levels between the root and the leaves.
    pub depth: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSmtConfig {
    #[serde(default)]
    digest_width: Option<usize>,
    #[serde(default)]
    depth: Option<usize>,
}

impl TryFrom<RawSmtConfig> for SmtConfig {
    type Error = SmtError;

    fn try_from(raw: RawSmtConfig) -> SmtResult<Self> {
        let config = SmtConfig::new(raw.digest_width.unwrap_or(1));
        let config = match raw.depth {
            Some(depth) => config.with_depth(depth),
            None => config,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for SmtConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SmtConfig {
    /// A tree keyed by `digest_width`-byte digests with one level per digest
    /// bit.
    pub const fn new(digest_width: usize) -> Self {
        Self {
            digest_width,
            depth: digest_width.saturating_mul(8),
        }
    }

    pub const fn with_depth(self, depth: usize) -> Self {
        Self { depth, ..self }
    }

    pub fn validate(&self) -> SmtResult<()> {
        check_width(self.digest_width)?;
        if self.depth > MAX_DEPTH {
            return Err(SmtError::InvalidDepth { depth: self.depth });
        }
        Ok(())
    }

    /// The digest identifying `leaf`.
    pub fn leaf_digest(&self, leaf: &[u8]) -> SmtResult<Digest> {
        check_width(self.digest_width)?;
        Ok(hash_leaf(leaf, self.digest_width))
    }
}
