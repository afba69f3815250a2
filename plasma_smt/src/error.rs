use ethereum_types::U256;
use thiserror::Error;

/// Stores the result of tree operations. Returns a [`SmtError`] upon failure.
pub type SmtResult<T> = Result<T, SmtError>;

/// An error type for sparse Merkle tree construction and proofs.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum SmtError {
    /// The configured digest width cannot be produced by Keccak-256. This is a
    /// configuration error.
    #[error("Keccak-256 cannot provide a {width}-byte digest! (supported widths: 1..=32)")]
    DigestUnavailable { width: usize },

    /// Leaf indices are 256-bit words, so deeper trees are not addressable.
    #[error("A tree of depth {depth} is not addressable by a 256-bit index!")]
    InvalidDepth { depth: usize },

    /// A leaf index does not fit in the tree's bit depth.
    #[error("Leaf index {index} does not fit in a tree of depth {depth}!")]
    IndexOutOfRange { index: U256, depth: usize },

    /// Two leaves were given the same index.
    #[error("Leaf index {0} was given more than once!")]
    DuplicateIndex(U256),

    /// A serialized proof is not a whole number of siblings for the tree.
    #[error("A proof of {found} bytes does not hold {depth} siblings of {width} bytes!")]
    InvalidProofLength {
        found: usize,
        depth: usize,
        width: usize,
    },
}
