//! Head/tail encoding of argument lists.
//!
//! A list of values (the arguments of a call, the components of a tuple or
//! the elements of an array) is laid out as a head region followed by a tail
//! region. Static values are written into the head in place. Dynamic values
//! get a one-word offset in the head, counted from the start of the list's
//! encoding, and their payload goes into the tail in argument order.
//!
//! Encoding is done in three steps so that nothing is written for invalid
//! input: the whole value tree is type checked first, then the width of the
//! head is computed from the types alone, and only then are heads and tails
//! serialized. Knowing the head width up front is what lets every offset be
//! written directly instead of being patched afterwards.

use ethereum_types::U256;
use log::trace;
use plasma_common::WORD_SIZE;

use crate::{
    error::{AbiError, AbiResult},
    param_type::ParamType,
    token::Token,
};

/// Encodes `tokens` as values of `types`, without any selector.
pub fn encode(types: &[ParamType], tokens: &[Token]) -> AbiResult<Vec<u8>> {
    if types.len() != tokens.len() {
        return Err(AbiError::ArityMismatch {
            expected: types.len(),
            found: tokens.len(),
        });
    }
    for (kind, token) in types.iter().zip(tokens) {
        token.type_check(kind)?;
    }

    let items = types.iter().zip(tokens).collect::<Vec<_>>();
    let mut out = Vec::with_capacity(items.iter().map(|(t, _)| t.head_len()).sum());
    encode_sequence(&items, &mut out);
    Ok(out)
}

fn encode_sequence(items: &[(&ParamType, &Token)], out: &mut Vec<u8>) {
    let head_len: usize = items.iter().map(|(kind, _)| kind.head_len()).sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for &(kind, token) in items {
        if kind.is_dynamic() {
            let offset = head_len + tail.len();
            trace!("Encoding dynamic `{}` at offset {}", kind, offset);
            push_word(&mut head, U256::from(offset));
            encode_value(kind, token, &mut tail);
        } else {
            trace!("Encoding static `{}` in place", kind);
            encode_value(kind, token, &mut head);
        }
    }
    debug_assert_eq!(head.len(), head_len);

    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
}

fn encode_value(kind: &ParamType, token: &Token, out: &mut Vec<u8>) {
    match (kind, token) {
        (ParamType::Uint(_), Token::Uint(v)) | (ParamType::Int(_), Token::Int(v)) => {
            push_word(out, *v)
        }
        (ParamType::Bool, Token::Bool(b)) => push_word(out, U256::from(*b as u8)),
        (ParamType::Address, Token::Address(a)) => {
            out.extend_from_slice(&[0; WORD_SIZE - 20]);
            out.extend_from_slice(a.as_bytes());
        }
        (ParamType::FixedBytes(_), Token::FixedBytes(b)) => push_padded(out, b),
        (ParamType::Bytes, Token::Bytes(b)) => {
            push_word(out, U256::from(b.len()));
            push_padded(out, b);
        }
        (ParamType::String, Token::String(s)) => {
            push_word(out, U256::from(s.len()));
            push_padded(out, s.as_bytes());
        }
        (ParamType::Array(elem), Token::Array(values)) => {
            push_word(out, U256::from(values.len()));
            let items = values.iter().map(|v| (&**elem, v)).collect::<Vec<_>>();
            encode_sequence(&items, out);
        }
        (ParamType::FixedArray(elem, _), Token::FixedArray(values)) => {
            let items = values.iter().map(|v| (&**elem, v)).collect::<Vec<_>>();
            encode_sequence(&items, out);
        }
        (ParamType::Tuple(components), Token::Tuple(values)) => {
            let items = components.iter().zip(values).collect::<Vec<_>>();
            encode_sequence(&items, out);
        }
        _ => unreachable!("values are type checked before encoding"),
    }
}

fn push_word(out: &mut Vec<u8>, v: U256) {
    let mut word = [0; WORD_SIZE];
    v.to_big_endian(&mut word);
    out.extend_from_slice(&word);
}

/// Appends `bytes` right-padded with zeros to a whole number of words.
fn push_padded(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes);
    let rem = bytes.len() % WORD_SIZE;
    if rem != 0 {
        out.resize(out.len() + WORD_SIZE - rem, 0);
    }
}
