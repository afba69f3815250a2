//! Bit paths through the tree.

use std::fmt::{self, Display};

use ethereum_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{SmtError, SmtResult};

pub type Bit = bool;

/// The path from the root to a node, one bit per level.
///
/// A path of `count` bits names a node `count` levels below the root. The most
/// significant of the `count` bits is the first branch taken from the root and
/// the least significant bit is the branch taken last, so a full-depth path
/// packs to exactly the leaf index. The root is the empty path.
#[derive(
    Copy, Clone, Deserialize, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Debug,
)]
pub struct Bits {
    /// The number of bits in this sequence.
    pub count: usize,
    /// A packed encoding of these bits. Only the first (least significant)
    /// `count` bits are used. The rest are unused and should be zero.
    pub packed: U256,
}

impl Bits {
    pub const fn empty() -> Self {
        Bits {
            count: 0,
            packed: U256::zero(),
        }
    }

    /// The path of the leaf at `index` in a tree of the given depth.
    pub fn from_index(index: U256, depth: usize) -> SmtResult<Self> {
        if depth < 256 && index >> depth != U256::zero() {
            return Err(SmtError::IndexOutOfRange { index, depth });
        }
        Ok(Bits {
            count: depth,
            packed: index,
        })
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Removes the last branch of the path, moving one level towards the root,
    /// and returns it (`true` means the node was a right child).
    pub fn pop_next_bit(&mut self) -> Bit {
        assert!(!self.is_empty(), "Cannot pop from empty bits");
        let b = self.packed.bit(0);
        self.packed >>= 1;
        self.count -= 1;
        b
    }

    /// The `i`-th branch counted from the root.
    pub fn get_bit(&self, i: usize) -> Bit {
        assert!(i < self.count, "Index out of bounds");
        self.packed.bit(self.count - 1 - i)
    }

    /// The other child of this node's parent.
    pub fn sibling(&self) -> Self {
        assert!(!self.is_empty(), "The root has no sibling");
        Bits {
            count: self.count,
            packed: self.packed ^ U256::one(),
        }
    }

    /// The parent of this node.
    pub fn parent(&self) -> Self {
        let mut x = *self;
        x.pop_next_bit();
        x
    }
}

impl Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<root>");
        }
        for i in 0..self.count {
            write!(f, "{}", self.get_bit(i) as u8)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_must_fit_depth() {
        assert!(Bits::from_index(U256::from(255), 8).is_ok());
        assert_eq!(
            Bits::from_index(U256::from(256), 8),
            Err(SmtError::IndexOutOfRange {
                index: U256::from(256),
                depth: 8
            })
        );
        assert!(Bits::from_index(U256::MAX, 256).is_ok());
        assert!(Bits::from_index(U256::zero(), 0).is_ok());
        assert!(Bits::from_index(U256::one(), 0).is_err());
    }

    #[test]
    fn bits_are_read_from_the_root() {
        let bits = Bits::from_index(U256::from(0b1101), 4).unwrap();
        assert_eq!(
            (0..4).map(|i| bits.get_bit(i)).collect::<Vec<_>>(),
            vec![true, true, false, true]
        );
        assert_eq!(bits.to_string(), "1101");
    }

    #[test]
    fn walking_up_to_the_root() {
        let mut bits = Bits::from_index(U256::from(0b110), 3).unwrap();
        assert_eq!(bits.sibling().packed, U256::from(0b111));
        assert!(!bits.pop_next_bit());
        assert_eq!(bits, Bits::from_index(U256::from(0b11), 2).unwrap());
        assert_eq!(bits.parent().parent(), Bits::empty());
        assert_eq!(Bits::empty().to_string(), "<root>");
    }
}
