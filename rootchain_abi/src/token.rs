//! Concrete argument values.

use std::fmt::{self, Display};

use enum_as_inner::EnumAsInner;
use ethereum_types::{H160, U256};
use itertools::Itertools;

use crate::{
    error::{AbiError, AbiResult},
    param_type::ParamType,
};

/// A value to encode for a parameter, or one decoded from call data.
///
/// Composite values mirror the composite [`ParamType`]s. Signed integers are
/// held as their 256-bit two's complement word; see [`Token::signed`].
#[derive(Clone, Debug, EnumAsInner, Eq, Hash, PartialEq)]
pub enum Token {
    Uint(U256),
    Int(U256),
    Bool(bool),
    Address(H160),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Token>),
    FixedArray(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    /// An `int<M>` value.
    pub fn signed(v: i128) -> Self {
        if v >= 0 {
            Token::Int(U256::from(v as u128))
        } else {
            // -v - 1 cannot overflow, and flipping its bits gives v.
            Token::Int(!U256::from((-(v + 1)) as u128))
        }
    }

    /// Checks that this value has the shape of `kind`, all the way down.
    pub fn type_check(&self, kind: &ParamType) -> AbiResult<()> {
        let fits = match (kind, self) {
            (ParamType::Uint(bits), Token::Uint(v)) => v.bits() <= *bits,
            (ParamType::Int(bits), Token::Int(v)) => fits_signed(v, *bits),
            (ParamType::Bool, Token::Bool(_))
            | (ParamType::Address, Token::Address(_))
            | (ParamType::Bytes, Token::Bytes(_))
            | (ParamType::String, Token::String(_)) => true,
            (ParamType::FixedBytes(len), Token::FixedBytes(v)) => v.len() == *len,
            (ParamType::Array(elem), Token::Array(values)) => {
                return values.iter().try_for_each(|v| v.type_check(elem));
            }
            (ParamType::FixedArray(elem, len), Token::FixedArray(values))
                if values.len() == *len =>
            {
                return values.iter().try_for_each(|v| v.type_check(elem));
            }
            (ParamType::Tuple(components), Token::Tuple(values))
                if values.len() == components.len() =>
            {
                return values
                    .iter()
                    .zip(components)
                    .try_for_each(|(v, c)| v.type_check(c));
            }
            _ => false,
        };

        match fits {
            true => Ok(()),
            false => Err(AbiError::TypeMismatch {
                expected: kind.to_string(),
                found: self.to_string(),
            }),
        }
    }
}

/// Whether the two's complement word `v` is representable in `bits` bits.
pub(crate) fn fits_signed(v: &U256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }
    let magnitude = match v.bit(255) {
        true => !*v,
        false => *v,
    };
    (magnitude >> (bits - 1)).is_zero()
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Uint(v) => write!(f, "{}", v),
            Token::Int(v) if v.bit(255) => write!(f, "-{}", (!*v).saturating_add(U256::one())),
            Token::Int(v) => write!(f, "{}", v),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Address(a) => write!(f, "{:?}", a),
            Token::FixedBytes(b) | Token::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Array(values) | Token::FixedArray(values) => {
                write!(f, "[{}]", values.iter().join(","))
            }
            Token::Tuple(values) => write!(f, "({})", values.iter().join(",")),
        }
    }
}

impl From<U256> for Token {
    fn from(v: U256) -> Self {
        Token::Uint(v)
    }
}

impl From<u64> for Token {
    fn from(v: u64) -> Self {
        Token::Uint(v.into())
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Token::Bool(b)
    }
}

impl From<H160> for Token {
    fn from(a: H160) -> Self {
        Token::Address(a)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::String(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_values() {
        assert_eq!(Token::signed(5), Token::Int(U256::from(5)));
        assert_eq!(Token::signed(-1), Token::Int(U256::MAX));
        assert_eq!(Token::signed(-2), Token::Int(U256::MAX - 1));
        assert_eq!(Token::signed(i128::MIN).to_string(), i128::MIN.to_string());
        assert_eq!(Token::signed(-42).to_string(), "-42");
    }

    #[test]
    fn integer_widths() {
        let uint8 = ParamType::Uint(8);
        assert!(Token::from(255u64).type_check(&uint8).is_ok());
        assert!(Token::from(256u64).type_check(&uint8).is_err());

        let int8 = ParamType::Int(8);
        assert!(Token::signed(127).type_check(&int8).is_ok());
        assert!(Token::signed(-128).type_check(&int8).is_ok());
        assert!(Token::signed(128).type_check(&int8).is_err());
        assert!(Token::signed(-129).type_check(&int8).is_err());
        assert!(Token::Int(U256::MAX).type_check(&ParamType::Int(256)).is_ok());
    }

    #[test]
    fn nested_shapes() {
        let kind: ParamType = "(uint256,(address,bytes))".parse().unwrap();
        let good = Token::Tuple(vec![
            Token::from(1u64),
            Token::Tuple(vec![Token::Address(H160::zero()), Token::Bytes(vec![])]),
        ]);
        assert!(good.type_check(&kind).is_ok());

        let scalar_for_tuple = Token::Tuple(vec![Token::from(1u64), Token::from(2u64)]);
        assert_eq!(
            scalar_for_tuple.type_check(&kind),
            Err(AbiError::TypeMismatch {
                expected: "(address,bytes)".to_owned(),
                found: "2".to_owned(),
            })
        );

        let short = Token::Tuple(vec![Token::from(1u64)]);
        assert_eq!(
            short.type_check(&kind),
            Err(AbiError::TypeMismatch {
                expected: "(uint256,(address,bytes))".to_owned(),
                found: "(1)".to_owned(),
            })
        );

        let fixed: ParamType = "bool[2]".parse().unwrap();
        assert!(Token::FixedArray(vec![true.into(), false.into()])
            .type_check(&fixed)
            .is_ok());
        assert!(Token::FixedArray(vec![true.into()]).type_check(&fixed).is_err());
        assert!(Token::Array(vec![true.into(), false.into()])
            .type_check(&fixed)
            .is_err());
    }

    #[test]
    fn fixed_bytes_length_is_exact() {
        assert!(Token::FixedBytes(vec![0; 32])
            .type_check(&ParamType::FixedBytes(32))
            .is_ok());
        assert!(Token::FixedBytes(vec![0; 31])
            .type_check(&ParamType::FixedBytes(32))
            .is_err());
    }
}
