//! Truncated Keccak-256 digests.

use std::fmt::{self, Binary, Debug, Display, LowerHex};

use ethereum_types::H256;
use serde::{Deserialize, Serialize};

use crate::error::{SmtError, SmtResult};

/// Widest digest available from Keccak-256.
pub const MAX_DIGEST_WIDTH: usize = 32;

/// The first `width` bytes of a Keccak-256 hash.
///
/// Bytes past `width` are always zero, so two digests compare equal iff they
/// have the same width and the same leading bytes. Serialized as its `width`
/// bytes only; deserialization goes through [`Digest::from_slice`].
#[derive(Copy, Clone, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Digest {
    width: usize,
    bytes: [u8; MAX_DIGEST_WIDTH],
}

impl Digest {
    /// The all-zero digest, used for leaf positions that hold nothing.
    /// `width` must already be validated.
    pub(crate) const fn zero(width: usize) -> Self {
        Digest {
            width,
            bytes: [0; MAX_DIGEST_WIDTH],
        }
    }

    /// Wraps raw digest bytes, e.g. a root received from a contract.
    pub fn from_slice(bytes: &[u8]) -> SmtResult<Self> {
        check_width(bytes.len())?;
        let mut digest = Self::zero(bytes.len());
        digest.bytes[..bytes.len()].copy_from_slice(bytes);
        Ok(digest)
    }

    /// Keeps the first `width` bytes of a full hash. `width` must already be
    /// validated.
    pub(crate) fn truncate(hash: H256, width: usize) -> Self {
        debug_assert!(check_width(width).is_ok());
        let mut digest = Self::zero(width);
        digest.bytes[..width].copy_from_slice(&hash.as_bytes()[..width]);
        digest
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.width]
    }

    pub fn is_zero(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }
}

pub(crate) fn check_width(width: usize) -> SmtResult<()> {
    match width {
        1..=MAX_DIGEST_WIDTH => Ok(()),
        _ => Err(SmtError::DigestUnavailable { width }),
    }
}

impl TryFrom<Vec<u8>> for Digest {
    type Error = SmtError;

    fn try_from(bytes: Vec<u8>) -> SmtResult<Self> {
        Self::from_slice(&bytes)
    }
}

impl From<Digest> for Vec<u8> {
    fn from(digest: Digest) -> Self {
        digest.as_bytes().to_vec()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest(0x{})", hex::encode(self.as_bytes()))
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self)
    }
}

impl LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.as_bytes()))
    }
}

/// The digest read as a big-endian integer, in base 2 without leading zeros.
impl Binary for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.as_bytes();
        let Some(first) = bytes.iter().position(|b| *b != 0) else {
            return write!(f, "0");
        };
        write!(f, "{:b}", bytes[first])?;
        for b in &bytes[first + 1..] {
            write!(f, "{:08b}", b)?;
        }
        Ok(())
    }
}
