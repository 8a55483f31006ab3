//! Decoder (C5): ABIv2 bytes -> [`Value`], driven by a [`Type`].

use crate::address::checksum_encode;
use crate::ast::Type;
use crate::encoder::integer_bounds;
use crate::error::DecodeError;
use crate::formatter::format;
use crate::value::Value;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

/// Options propagated to every recursive decode call.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Decode `address` to its EIP-55 checksummed form. If false, lowercase hex.
    pub checksum: bool,
    /// Use `String::from_utf8_lossy` instead of rejecting invalid UTF-8.
    pub lossy_strings: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            checksum: true,
            lossy_strings: false,
        }
    }
}

/// Decode `bytes` against `ty`, returning the decoded value.
pub fn decode(ty: &Type, bytes: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    match ty {
        Type::Address => decode_address(ty, bytes, options),
        Type::Bool => decode_bool(ty, bytes),
        Type::Integer { bits, signed } => decode_integer(ty, bytes, *bits, *signed).map(Value::Int),
        Type::Fixed { bits, precision, signed } => decode_fixed(ty, bytes, *bits, *precision, *signed),
        Type::Bytes { size } => decode_bytes(ty, bytes, *size),
        Type::String => decode_string(ty, bytes, options),
        Type::Array { element, length } => decode_array(ty, element, *length, bytes, options),
        Type::Tuple { components } => decode_tuple(ty, components, bytes, options),
    }
}

fn err(ty: &Type, msg: impl Into<String>) -> DecodeError {
    DecodeError::new(format(ty), msg.into())
}

fn take_word<'a>(ty: &Type, buf: &'a [u8]) -> Result<&'a [u8], DecodeError> {
    if buf.len() < 32 {
        return Err(err(ty, "Value is not 32 bytes"));
    }
    Ok(&buf[..32])
}

/// Assert the bits of `word` outside the valid range are zero.
///
/// `bits >= 0`: the value occupies the low `bits` bits (left-zero-padded,
/// e.g. `address`, `bool`). `bits < 0`: the value occupies the top `|bits|`
/// bits (right-zero-padded, e.g. static `bytesN`).
fn validate_atom(word: &[u8], bits: i32) -> Result<(), &'static str> {
    if bits >= 0 {
        let bits = bits as u32;
        let full_bytes = (bits / 8) as usize;
        let rem_bits = bits % 8;
        let zero_bytes = 32 - full_bytes - if rem_bits > 0 { 1 } else { 0 };
        if word[..zero_bytes].iter().any(|&b| b != 0) {
            return Err("Value outside type bounds");
        }
        if rem_bits > 0 {
            let mask = 0xFFu8 << rem_bits;
            if word[zero_bytes] & mask != 0 {
                return Err("Value outside type bounds");
            }
        }
    } else {
        let bits = (-bits) as u32;
        let full_bytes = (bits / 8) as usize;
        let rem_bits = bits % 8;
        let start = full_bytes + if rem_bits > 0 { 1 } else { 0 };
        if word[start..].iter().any(|&b| b != 0) {
            return Err("Value outside type bounds");
        }
        if rem_bits > 0 {
            let mask = 0xFFu8 >> rem_bits;
            if word[full_bytes] & mask != 0 {
                return Err("Value outside type bounds");
            }
        }
    }
    Ok(())
}

fn word_to_u64(ty: &Type, word: &[u8]) -> Result<u64, DecodeError> {
    BigInt::from_bytes_be(Sign::Plus, word)
        .to_u64()
        .ok_or_else(|| err(ty, "Data section is not the correct size"))
}

fn decode_address(ty: &Type, buf: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let word = take_word(ty, buf)?;
    validate_atom(word, 160).map_err(|m| err(ty, m))?;
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&word[12..32]);
    let s = if options.checksum {
        checksum_encode(&addr)
    } else {
        format!("0x{}", hex::encode(addr))
    };
    Ok(Value::Address(s))
}

fn decode_bool(ty: &Type, buf: &[u8]) -> Result<Value, DecodeError> {
    let word = take_word(ty, buf)?;
    validate_atom(word, 1).map_err(|m| err(ty, m))?;
    Ok(Value::Bool(word[31] & 1 == 1))
}

fn decode_int_word(word: &[u8], signed: bool) -> BigInt {
    let unsigned = BigInt::from_bytes_be(Sign::Plus, word);
    if signed && word[0] & 0x80 != 0 {
        unsigned - (BigInt::from(1) << 256)
    } else {
        unsigned
    }
}

fn decode_integer(ty: &Type, buf: &[u8], bits: u16, signed: bool) -> Result<BigInt, DecodeError> {
    let word = take_word(ty, buf)?;
    let i = decode_int_word(word, signed);
    let (lo, hi) = integer_bounds(bits, signed);
    if i < lo || i > hi {
        return Err(err(ty, "Value outside type bounds"));
    }
    Ok(i)
}

fn decode_fixed(
    ty: &Type,
    buf: &[u8],
    bits: u16,
    precision: u8,
    signed: bool,
) -> Result<Value, DecodeError> {
    let i = decode_integer(ty, buf, bits, signed)?;
    Ok(Value::Fixed(BigDecimal::new(i, precision as i64)))
}

fn decode_bytes(ty: &Type, buf: &[u8], size: Option<u8>) -> Result<Value, DecodeError> {
    match size {
        Some(n) => {
            let word = take_word(ty, buf)?;
            validate_atom(word, -(i32::from(n) * 8)).map_err(|m| err(ty, m))?;
            Ok(Value::Bytes(word[..n as usize].to_vec()))
        }
        None => {
            if buf.len() < 32 {
                return Err(err(ty, "Invalid size for dynamic bytes"));
            }
            let n = word_to_u64(ty, &buf[..32])? as usize;
            if buf.len() - 32 < n {
                return Err(err(ty, "Data section is not the correct size"));
            }
            Ok(Value::Bytes(buf[32..32 + n].to_vec()))
        }
    }
}

fn decode_string(ty: &Type, buf: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let Value::Bytes(raw) = decode_bytes(ty, buf, None)? else {
        unreachable!("decode_bytes always returns Value::Bytes");
    };
    let s = if options.lossy_strings {
        String::from_utf8_lossy(&raw).into_owned()
    } else {
        String::from_utf8(raw).map_err(|_| err(ty, "Value is not valid UTF-8"))?
    };
    Ok(Value::Str(s))
}

/// Shared head/tail decode for Tuple components and (identically-typed)
/// Array elements: `types[i]` is static or dynamic independently, mirroring
/// the encoder's `encode_sequence`.
fn decode_sequence(
    ty: &Type,
    types: &[&Type],
    buf: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<Value>, DecodeError> {
    let widths: Vec<u32> = types.iter().map(|t| t.head_width()).collect();
    let mut offsets = Vec::with_capacity(types.len());
    let mut acc: u32 = 0;
    for w in &widths {
        offsets.push(acc);
        acc += w;
    }

    let mut dyn_ptrs: Vec<(usize, u64)> = Vec::new();
    for (i, t) in types.iter().enumerate() {
        if t.is_dynamic() {
            let off = offsets[i] as usize;
            if buf.len() < off + 32 {
                return Err(err(ty, "Data section is not the correct size"));
            }
            let ptr = word_to_u64(ty, &buf[off..off + 32])?;
            dyn_ptrs.push((i, ptr));
        }
    }

    let mut values: Vec<Option<Value>> = (0..types.len()).map(|_| None).collect();
    for (k, &(i, ptr)) in dyn_ptrs.iter().enumerate() {
        let start = ptr as usize;
        let end = if k + 1 < dyn_ptrs.len() {
            dyn_ptrs[k + 1].1 as usize
        } else {
            buf.len()
        };
        if start > end || end > buf.len() {
            return Err(err(ty, "Data section is not the correct size"));
        }
        values[i] = Some(decode(types[i], &buf[start..end], options)?);
    }
    for (i, t) in types.iter().enumerate() {
        if !t.is_dynamic() {
            let off = offsets[i] as usize;
            let w = widths[i] as usize;
            if buf.len() < off + w {
                return Err(err(ty, "Static array value invalid length"));
            }
            values[i] = Some(decode(t, &buf[off..off + w], options)?);
        }
    }
    Ok(values.into_iter().map(|v| v.expect("every index filled above")).collect())
}

fn decode_array(
    ty: &Type,
    element: &Type,
    length: Option<u32>,
    buf: &[u8],
    options: &DecodeOptions,
) -> Result<Value, DecodeError> {
    match length {
        Some(n) => {
            let required = n as u64 * element.head_width() as u64;
            if (buf.len() as u64) < required {
                return Err(err(ty, "Static array value invalid length"));
            }
            let types: Vec<&Type> = std::iter::repeat(element).take(n as usize).collect();
            let values = decode_sequence(ty, &types, buf, options)?;
            Ok(Value::Array(values))
        }
        None => {
            if buf.len() < 32 {
                return Err(err(ty, "Data section is not the correct size"));
            }
            let n = word_to_u64(ty, &buf[..32])?;
            let tail = &buf[32..];
            if n == 0 {
                return Ok(Value::Array(Vec::new()));
            }
            n.checked_mul(element.head_width() as u64)
                .filter(|required| *required <= tail.len() as u64)
                .ok_or_else(|| err(ty, "Data section is not the correct size"))?;
            let n = n as usize;
            let types: Vec<&Type> = std::iter::repeat(element).take(n).collect();
            let values = decode_sequence(ty, &types, tail, options)?;
            Ok(Value::Array(values))
        }
    }
}

fn decode_tuple(
    ty: &Type,
    components: &[Type],
    buf: &[u8],
    options: &DecodeOptions,
) -> Result<Value, DecodeError> {
    if components.is_empty() {
        return Ok(Value::Tuple(Vec::new()));
    }
    let types: Vec<&Type> = components.iter().collect();
    let values = decode_sequence(ty, &types, buf, options)?;
    Ok(Value::Tuple(values))
}
