//! Canonical signatures and the function selectors derived from them.

use std::fmt::{self, Display};

use itertools::Itertools;
use plasma_common::keccak_prefix;

use crate::param_type::ParamType;

/// The 4-byte identifier prefixed to call data.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Selector(pub [u8; 4]);

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for Selector {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Renders a parameter list as `(T1,T2,...)`, tuples expanded recursively.
pub fn signature<'a, I>(inputs: I) -> String
where
    I: IntoIterator<Item = &'a ParamType>,
{
    format!("({})", inputs.into_iter().join(","))
}

/// The selector of a full signature such as `transfer(address,uint256)`.
pub fn selector_of(full_signature: &str) -> Selector {
    Selector(keccak_prefix(full_signature))
}

/// The selector of function `name` taking parameters rendered as `signature`.
pub fn selector(name: &str, signature: &str) -> Selector {
    selector_of(&format!("{}{}", name, signature))
}
