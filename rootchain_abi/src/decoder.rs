//! Decoding of head/tail encoded argument lists back into [`Token`]s.

use std::iter;

use ethereum_types::{H160, U256};
use log::trace;
use plasma_common::WORD_SIZE;

use crate::{
    error::{AbiError, AbiResult},
    param_type::ParamType,
    token::{fits_signed, Token},
};

/// Decodes `data` as values of `types`, without any selector.
///
/// Offsets are followed wherever they point inside `data`, and trailing
/// bytes after the last value are ignored. Words whose padding is not what
/// the encoder would have written are rejected.
pub fn decode(types: &[ParamType], data: &[u8]) -> AbiResult<Vec<Token>> {
    decode_sequence(types, data, 0)
}

/// Decodes a list of values whose encoding starts at `start`. Offsets found
/// in its head are relative to `start`.
fn decode_sequence<'a, I>(kinds: I, data: &[u8], start: usize) -> AbiResult<Vec<Token>>
where
    I: IntoIterator<Item = &'a ParamType>,
{
    let mut head = start;
    kinds
        .into_iter()
        .map(|kind| {
            let token = if kind.is_dynamic() {
                let offset = read_usize(data, head)?;
                let at = start
                    .checked_add(offset)
                    .ok_or_else(|| invalid(format!("offset {} overflows", offset)))?;
                trace!("Decoding dynamic `{}` at byte {}", kind, at);
                decode_value(kind, data, at)?
            } else {
                trace!("Decoding static `{}` at byte {}", kind, head);
                decode_value(kind, data, head)?
            };
            head = head.saturating_add(kind.head_len());
            Ok(token)
        })
        .collect()
}

fn decode_value(kind: &ParamType, data: &[u8], at: usize) -> AbiResult<Token> {
    match kind {
        ParamType::Uint(bits) => {
            let v = read_word(data, at)?;
            match v.bits() <= *bits {
                true => Ok(Token::Uint(v)),
                false => Err(invalid(format!("{} does not fit `{}`", v, kind))),
            }
        }
        ParamType::Int(bits) => {
            let v = read_word(data, at)?;
            match fits_signed(&v, *bits) {
                true => Ok(Token::Int(v)),
                false => Err(invalid(format!("{:#x} is not a sign-extended `{}`", v, kind))),
            }
        }
        ParamType::Bool => {
            let v = read_word(data, at)?;
            match v.bits() <= 1 {
                true => Ok(Token::Bool(!v.is_zero())),
                false => Err(invalid(format!("{:#x} at byte {} is not a bool", v, at))),
            }
        }
        ParamType::Address => {
            let word = read_slice(data, at, WORD_SIZE)?;
            let (padding, address) = word.split_at(WORD_SIZE - 20);
            check_zero(padding, at)?;
            Ok(Token::Address(H160::from_slice(address)))
        }
        ParamType::FixedBytes(len) => {
            let word = read_slice(data, at, WORD_SIZE)?;
            let (value, padding) = word.split_at(*len);
            check_zero(padding, at)?;
            Ok(Token::FixedBytes(value.to_vec()))
        }
        ParamType::Bytes => read_bytes(data, at).map(|b| Token::Bytes(b.to_vec())),
        ParamType::String => {
            let bytes = read_bytes(data, at)?;
            String::from_utf8(bytes.to_vec())
                .map(Token::String)
                .map_err(|_| invalid(format!("string at byte {} is not UTF-8", at)))
        }
        ParamType::Array(elem) => {
            let len = read_usize(data, at)?;
            let start = at + WORD_SIZE;
            // Every element takes at least one word of head, so a length the
            // data cannot hold is rejected before anything is allocated.
            let remaining = data.len().saturating_sub(start);
            if len.saturating_mul(elem.head_len()) > remaining {
                return Err(invalid(format!(
                    "array of {} `{}` at byte {} exceeds the data",
                    len, elem, at
                )));
            }
            decode_sequence(iter::repeat(&**elem).take(len), data, start).map(Token::Array)
        }
        ParamType::FixedArray(elem, len) => {
            decode_sequence(iter::repeat(&**elem).take(*len), data, at).map(Token::FixedArray)
        }
        ParamType::Tuple(components) => decode_sequence(components, data, at).map(Token::Tuple),
    }
}

fn invalid(msg: String) -> AbiError {
    AbiError::InvalidData(msg)
}

fn read_slice(data: &[u8], at: usize, len: usize) -> AbiResult<&[u8]> {
    at.checked_add(len)
        .and_then(|end| data.get(at..end))
        .ok_or_else(|| {
            invalid(format!(
                "need {} bytes at byte {} but the data is {} bytes long",
                len,
                at,
                data.len()
            ))
        })
}

fn read_word(data: &[u8], at: usize) -> AbiResult<U256> {
    read_slice(data, at, WORD_SIZE).map(U256::from_big_endian)
}

/// Reads a length or an offset.
fn read_usize(data: &[u8], at: usize) -> AbiResult<usize> {
    let v = read_word(data, at)?;
    if v.bits() > 64 {
        return Err(invalid(format!("{:#x} at byte {} is not a valid length", v, at)));
    }
    usize::try_from(v.low_u64())
        .map_err(|_| invalid(format!("{} at byte {} is not a valid length", v, at)))
}

/// Reads a length-prefixed byte string.
fn read_bytes(data: &[u8], at: usize) -> AbiResult<&[u8]> {
    let len = read_usize(data, at)?;
    read_slice(data, at + WORD_SIZE, len)
}

fn check_zero(padding: &[u8], at: usize) -> AbiResult<()> {
    match padding.iter().all(|b| *b == 0) {
        true => Ok(()),
        false => Err(invalid(format!("dirty padding in word at byte {}", at))),
    }
}
