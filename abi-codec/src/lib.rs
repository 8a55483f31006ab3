//! Bidirectional codec for the Ethereum contract ABIv2 wire format.
//!
//! `abi-codec` turns a schema string such as `"(uint256,address[])"` into a
//! [`Type`] AST, turns values into the canonical head/tail-encoded bytes that
//! AST describes, and turns bytes back into values. Integers and fixed point
//! decimals are arbitrary precision (`num-bigint`/`bigdecimal`) so nothing is
//! silently truncated to a host machine width.
//!
//! ```
//! use abi_codec::{parse, encode, decode, Value, DecodeOptions};
//! use num_bigint::BigInt;
//!
//! let ty = parse("(uint256,string)").unwrap();
//! let value = Value::Tuple(vec![Value::Int(BigInt::from(42)), Value::Str("hi".into())]);
//! let bytes = encode(&ty, &value).unwrap();
//! let decoded = decode(&ty, &bytes, &DecodeOptions::default()).unwrap();
//! assert_eq!(decoded, value);
//! ```

pub mod address;
pub mod ast;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod value;

#[cfg(test)]
mod proptests;

pub use address::{checksum_encode, keccak256};
pub use ast::Type;
pub use decoder::DecodeOptions;
pub use error::{ArgumentError, CodecError, DecodeError, EncodeError, ParseError};
pub use value::Value;

/// Parse a schema string into a [`Type`].
pub fn parse(schema: &str) -> Result<Type, ParseError> {
    parser::parse(schema)
}

/// Render a [`Type`] as its canonical schema string.
pub fn format(ty: &Type) -> String {
    formatter::format(ty)
}

/// Encode `value` against `ty`, returning canonical ABIv2 bytes.
pub fn encode(ty: &Type, value: &Value) -> Result<Vec<u8>, EncodeError> {
    encoder::encode(ty, value)
}

/// Decode `bytes` against `ty`, returning the decoded value.
pub fn decode(ty: &Type, bytes: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    decoder::decode(ty, bytes, options)
}

/// Parse a schema and decode `bytes` against it in one call.
///
/// Convenience wrapper for callers that only have a schema string, not a
/// pre-parsed [`Type`]; folds [`ParseError`] and [`DecodeError`] into a
/// single [`CodecError`].
pub fn decode_schema(schema: &str, bytes: &[u8], options: &DecodeOptions) -> Result<Value, CodecError> {
    let ty = parse(schema)?;
    Ok(decode(&ty, bytes, options)?)
}

/// Parse a schema and encode `value` against it in one call.
pub fn encode_schema(schema: &str, value: &Value) -> Result<Vec<u8>, CodecError> {
    let ty = parse(schema)?;
    Ok(encode(&ty, value)?)
}
