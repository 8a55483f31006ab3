//! The domain value model (C6): runtime values passed to the encoder and
//! returned by the decoder.
//!
//! Mirrors [`crate::ast::Type`] variant-for-variant. Integers and fixed
//! point decimals are arbitrary precision so this crate never silently
//! truncates a value the way a host `i64`/`f64` would.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// A value to encode, or a value produced by decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 20-byte address, stored as a lowercase `0x`-prefixed hex string.
    Address(String),
    Bool(bool),
    /// `[u]intN` payload, arbitrary precision.
    Int(BigInt),
    /// `[u]fixedMxN` payload, arbitrary precision.
    Fixed(BigDecimal),
    /// `bytes` / `bytesN` payload.
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(BigInt::from(i))
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Value::Int(BigInt::from(i))
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::Fixed(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl Value {
    /// A short, human-readable rendering used inside encoder error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Address(a) => a.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Fixed(d) => d.to_string(),
            Value::Bytes(b) => format!("0x{}", hex::encode(b)),
            Value::Str(s) => format!("{s:?}"),
            Value::Array(items) => format!("[{} items]", items.len()),
            Value::Tuple(items) => format!("({} items)", items.len()),
        }
    }
}
