//! Encoder (C4): [`Type`] + [`Value`] -> ABIv2 bytes.

use crate::ast::Type;
use crate::error::EncodeError;
use crate::formatter::format;
use crate::value::Value;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

/// Encode `value` against `ty`, returning canonical ABIv2 bytes.
pub fn encode(ty: &Type, value: &Value) -> Result<Vec<u8>, EncodeError> {
    match ty {
        Type::Address => encode_address(ty, value),
        Type::Bool => encode_bool(ty, value),
        Type::Integer { bits, signed } => {
            let i = expect_int(ty, value)?;
            Ok(encode_integer_word(ty, i, *bits, *signed)?.to_vec())
        }
        Type::Fixed { bits, precision, signed } => encode_fixed(ty, value, *bits, *precision, *signed),
        Type::Bytes { size } => encode_bytes(ty, value, *size),
        Type::String => encode_string(ty, value),
        Type::Array { element, length } => encode_array(ty, element, *length, value),
        Type::Tuple { components } => encode_tuple(ty, components, value),
    }
}

fn err(ty: &Type, value: &Value, msg: impl Into<String>) -> EncodeError {
    EncodeError::new(format(ty), format!("{}: {}", msg.into(), value.describe()))
}

fn encode_address(ty: &Type, value: &Value) -> Result<Vec<u8>, EncodeError> {
    let Value::Address(s) = value else {
        return Err(err(ty, value, "value is not an address"));
    };
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|_| err(ty, value, "address is not valid hex"))?;
    if bytes.len() != 20 {
        return Err(err(ty, value, "address must decode to 20 bytes"));
    }
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&bytes);
    Ok(word.to_vec())
}

fn encode_bool(ty: &Type, value: &Value) -> Result<Vec<u8>, EncodeError> {
    let Value::Bool(b) = value else {
        return Err(err(ty, value, "value is not a bool"));
    };
    let mut word = [0u8; 32];
    word[31] = *b as u8;
    Ok(word.to_vec())
}

fn expect_int<'a>(ty: &Type, value: &'a Value) -> Result<&'a BigInt, EncodeError> {
    match value {
        Value::Int(i) => Ok(i),
        _ => Err(err(ty, value, "value is not an integer")),
    }
}

pub(crate) fn integer_bounds(bits: u16, signed: bool) -> (BigInt, BigInt) {
    let bits = bits as u32;
    if signed {
        let half = BigInt::from(1) << (bits - 1);
        (-&half, half - BigInt::from(1))
    } else {
        (BigInt::from(0), (BigInt::from(1) << bits) - BigInt::from(1))
    }
}

fn encode_integer_word(ty: &Type, i: &BigInt, bits: u16, signed: bool) -> Result<[u8; 32], EncodeError> {
    let (lo, hi) = integer_bounds(bits, signed);
    if i < &lo || i > &hi {
        return Err(EncodeError::new(
            format(ty),
            format!("value {i} is outside bounds [{lo}, {hi}]"),
        ));
    }
    Ok(word_from_bigint(i))
}

/// Render a (bounds-checked) integer as its 256-bit two's complement word.
fn word_from_bigint(i: &BigInt) -> [u8; 32] {
    let modulus = BigInt::from(1) << 256;
    let unsigned = if i.sign() == Sign::Minus { i + &modulus } else { i.clone() };
    let (_, bytes) = unsigned.to_bytes_be();
    let mut word = [0u8; 32];
    let start = 32 - bytes.len();
    word[start..].copy_from_slice(&bytes);
    word
}

fn pow10(n: u32) -> BigInt {
    let mut result = BigInt::from(1);
    for _ in 0..n {
        result *= 10;
    }
    result
}

/// Scale a decimal to an integer of `precision` decimal places, failing if
/// that loses precision (i.e. the value has more significant decimal digits
/// than `precision` allows).
fn scale_to_integer(value: &BigDecimal, precision: u8) -> Result<BigInt, ()> {
    let (digits, exponent) = value.as_bigint_and_exponent();
    let precision = precision as i64;
    if exponent <= precision {
        Ok(digits * pow10((precision - exponent) as u32))
    } else {
        let divisor = pow10((exponent - precision) as u32);
        if &digits % &divisor != BigInt::from(0) {
            return Err(());
        }
        Ok(digits / divisor)
    }
}

fn encode_fixed(
    ty: &Type,
    value: &Value,
    bits: u16,
    precision: u8,
    signed: bool,
) -> Result<Vec<u8>, EncodeError> {
    let Value::Fixed(d) = value else {
        return Err(err(ty, value, "value is not a fixed point decimal"));
    };
    let scaled = scale_to_integer(d, precision)
        .map_err(|_| err(ty, value, "precision of value is greater than allowed"))?;
    Ok(encode_integer_word(ty, &scaled, bits, signed)?.to_vec())
}

fn encode_bytes(ty: &Type, value: &Value, size: Option<u8>) -> Result<Vec<u8>, EncodeError> {
    let Value::Bytes(b) = value else {
        return Err(err(ty, value, "value is not a byte string"));
    };
    match size {
        Some(n) => {
            if b.len() > n as usize {
                return Err(err(ty, value, format!("byte string longer than bytes{n}")));
            }
            let mut word = [0u8; 32];
            word[..b.len()].copy_from_slice(b);
            Ok(word.to_vec())
        }
        None => Ok(encode_dynamic_bytes(b)),
    }
}

fn encode_dynamic_bytes(b: &[u8]) -> Vec<u8> {
    let mut out = word_from_bigint(&BigInt::from(b.len())).to_vec();
    out.extend_from_slice(b);
    let padded_len = (b.len() + 31) / 32 * 32;
    out.resize(32 + padded_len, 0);
    out
}

fn encode_string(ty: &Type, value: &Value) -> Result<Vec<u8>, EncodeError> {
    let Value::Str(s) = value else {
        return Err(err(ty, value, "value is not a string"));
    };
    Ok(encode_dynamic_bytes(s.as_bytes()))
}

/// Shared head/tail layout driving Array and Tuple encoding.
///
/// `types[i]` is the schema of `values[i]`; returns the concatenated
/// `head || tail` with no outer length prefix (callers of dynamic `Array`
/// prepend that themselves).
fn encode_sequence(types: &[&Type], values: &[Value]) -> Result<Vec<u8>, EncodeError> {
    let mut tails = Vec::with_capacity(types.len());
    for (t, v) in types.iter().zip(values) {
        tails.push(encode(t, v)?);
    }
    let head_width: u64 = types
        .iter()
        .map(|t| if t.is_dynamic() { 32 } else { t.head_width() as u64 })
        .sum();

    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut running_tail_len: u64 = 0;
    for (t, encoded) in types.iter().zip(&tails) {
        if t.is_dynamic() {
            let offset = head_width + running_tail_len;
            head.extend_from_slice(&word_from_bigint(&BigInt::from(offset)));
            running_tail_len += encoded.len() as u64;
            tail.extend_from_slice(encoded);
        } else {
            head.extend_from_slice(encoded);
        }
    }
    head.extend(tail);
    Ok(head)
}

fn encode_array(
    ty: &Type,
    element: &Type,
    length: Option<u32>,
    value: &Value,
) -> Result<Vec<u8>, EncodeError> {
    let Value::Array(items) = value else {
        return Err(err(ty, value, "value is not an array"));
    };
    if let Some(n) = length {
        if items.len() != n as usize {
            return Err(err(
                ty,
                value,
                format!("array has {} elements, expected {n}", items.len()),
            ));
        }
    }
    let types: Vec<&Type> = std::iter::repeat(element).take(items.len()).collect();
    let body = encode_sequence(&types, items)?;
    if length.is_some() {
        Ok(body)
    } else {
        let mut out = word_from_bigint(&BigInt::from(items.len())).to_vec();
        out.extend(body);
        Ok(out)
    }
}

fn encode_tuple(ty: &Type, components: &[Type], value: &Value) -> Result<Vec<u8>, EncodeError> {
    let Value::Tuple(items) = value else {
        return Err(err(ty, value, "value is not a tuple"));
    };
    if items.len() != components.len() {
        return Err(err(
            ty,
            value,
            format!("tuple has {} elements, expected {}", items.len(), components.len()),
        ));
    }
    if components.is_empty() {
        return Ok(Vec::new());
    }
    let types: Vec<&Type> = components.iter().collect();
    encode_sequence(&types, items)
}
