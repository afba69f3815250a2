//! Parameter types and their canonical names.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use itertools::Itertools;
use plasma_common::WORD_SIZE;

use crate::error::{AbiError, AbiResult};

/// The type of a function parameter.
///
/// Type strings from the interface description are decoded into this once,
/// when the registry is built. [`Display`] renders the canonical name used in
/// signatures; [`FromStr`] parses it back.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ParamType {
    /// `uint<M>`, `M` bits.
    Uint(usize),
    /// `int<M>`, `M` bits, two's complement.
    Int(usize),
    Bool,
    /// 20-byte account address.
    Address,
    /// `bytes<M>`, `1 <= M <= 32`.
    FixedBytes(usize),
    /// Dynamically sized byte string.
    Bytes,
    /// Dynamically sized UTF-8 string.
    String,
    /// `T[]`.
    Array(Box<ParamType>),
    /// `T[k]`.
    FixedArray(Box<ParamType>, usize),
    /// `(T1,T2,...)`.
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Whether values of this type are stored out of line, behind an offset.
    ///
    /// Tuples and fixed arrays are dynamic iff one of their components is.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(elem, _) => elem.is_dynamic(),
            ParamType::Tuple(components) => components.iter().any(ParamType::is_dynamic),
            ParamType::Uint(_)
            | ParamType::Int(_)
            | ParamType::Bool
            | ParamType::Address
            | ParamType::FixedBytes(_) => false,
        }
    }

    /// Number of bytes this type takes in the head of an enclosing tuple: one
    /// word for dynamic types (the offset), the full inline width otherwise.
    ///
    /// Saturates at `usize::MAX` for fixed arrays too large to address.
    pub fn head_len(&self) -> usize {
        if self.is_dynamic() {
            return WORD_SIZE;
        }
        match self {
            ParamType::FixedArray(elem, len) => len.saturating_mul(elem.head_len()),
            ParamType::Tuple(components) => components
                .iter()
                .map(ParamType::head_len)
                .fold(0, usize::saturating_add),
            _ => WORD_SIZE,
        }
    }

    /// Builds a type from an interface description record: `type` is the
    /// record's type string and `components` its component list, which only
    /// tuple types (`tuple`, `tuple[]`, `tuple[2]`, ...) may carry.
    pub fn from_abi(kind: &str, components: Option<Vec<ParamType>>) -> AbiResult<Self> {
        match (kind.strip_prefix("tuple"), components) {
            (Some(suffix), Some(components)) => {
                if components.is_empty() {
                    return Err(AbiError::MalformedInterface(format!(
                        "tuple parameter `{}` has no components",
                        kind
                    )));
                }
                parse_array_suffix(ParamType::Tuple(components), suffix, kind)
            }
            (Some(_), None) => Err(AbiError::MalformedInterface(format!(
                "tuple parameter `{}` is missing its components",
                kind
            ))),
            (None, Some(_)) => Err(AbiError::MalformedInterface(format!(
                "non-tuple parameter `{}` carries components",
                kind
            ))),
            (None, None) => kind.parse(),
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Address => write!(f, "address"),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::String => write!(f, "string"),
            ParamType::Array(elem) => write!(f, "{}[]", elem),
            ParamType::FixedArray(elem, len) => write!(f, "{}[{}]", elem, len),
            ParamType::Tuple(components) => write!(f, "({})", components.iter().join(",")),
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        let unknown = || AbiError::UnknownTypeTag(s.to_owned());

        if let Some(open) = s.strip_suffix(']').and_then(|rest| rest.rfind('[')) {
            let elem = s[..open].parse::<ParamType>()?;
            return parse_array_suffix(elem, &s[open..], s);
        }

        if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
            let components = split_top_level(inner)
                .ok_or_else(unknown)?
                .into_iter()
                .map(|component| component.parse::<ParamType>().map_err(|_| unknown()))
                .collect::<AbiResult<Vec<_>>>()?;
            if components.is_empty() {
                return Err(unknown());
            }
            return Ok(ParamType::Tuple(components));
        }

        match s {
            "address" => return Ok(ParamType::Address),
            "bool" => return Ok(ParamType::Bool),
            "bytes" => return Ok(ParamType::Bytes),
            "string" => return Ok(ParamType::String),
            "uint" => return Ok(ParamType::Uint(256)),
            "int" => return Ok(ParamType::Int(256)),
            _ => {}
        }

        if let Some(bits) = s.strip_prefix("uint") {
            return parse_int_width(bits).map(ParamType::Uint).ok_or_else(unknown);
        }
        if let Some(bits) = s.strip_prefix("int") {
            return parse_int_width(bits).map(ParamType::Int).ok_or_else(unknown);
        }
        if let Some(len) = s.strip_prefix("bytes") {
            return match parse_decimal(len) {
                Some(len @ 1..=32) => Ok(ParamType::FixedBytes(len)),
                _ => Err(unknown()),
            };
        }

        Err(unknown())
    }
}

/// Wraps `elem` in one array layer per `[..]` group of `suffix`, innermost
/// first, so `uint8[2][]` is a dynamic array of `uint8[2]`.
fn parse_array_suffix(mut elem: ParamType, suffix: &str, whole: &str) -> AbiResult<ParamType> {
    let unknown = || AbiError::UnknownTypeTag(whole.to_owned());

    let mut rest = suffix;
    while !rest.is_empty() {
        let group = rest.strip_prefix('[').ok_or_else(unknown)?;
        let close = group.find(']').ok_or_else(unknown)?;
        elem = match &group[..close] {
            "" => ParamType::Array(Box::new(elem)),
            len => match parse_decimal(len) {
                // The inline width of the array must stay addressable.
                Some(len) if len > 0 && len.checked_mul(elem.head_len()).is_some() => {
                    ParamType::FixedArray(Box::new(elem), len)
                }
                _ => return Err(unknown()),
            },
        };
        rest = &group[close + 1..];
    }
    Ok(elem)
}

/// Splits a tuple body on the commas that are not nested in parentheses.
/// Returns `None` if the parentheses are unbalanced.
fn split_top_level(s: &str) -> Option<Vec<&str>> {
    if s.is_empty() {
        return Some(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&s[start..]);
    Some(parts)
}

fn parse_decimal(s: &str) -> Option<usize> {
    // `usize::from_str` accepts a leading `+`, canonical names do not.
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0'))
    {
        return None;
    }
    s.parse().ok()
}

fn parse_int_width(s: &str) -> Option<usize> {
    parse_decimal(s).filter(|bits| (8..=256).contains(bits) && bits % 8 == 0)
}
