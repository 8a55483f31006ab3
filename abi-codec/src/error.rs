//! Error taxonomy for schema parsing, encoding, and decoding.
//!
//! Each stage of the codec raises its own error type so that callers can
//! distinguish "the schema is malformed" from "the value doesn't fit the
//! schema" from "the bytes don't fit the schema" without string matching.

use serde::Serialize;
use thiserror::Error;

/// A schema string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{msg} (in {where_:?})")]
pub struct ParseError {
    /// The offending substring of the schema.
    pub where_: String,
    /// Human-readable reason.
    pub msg: String,
}

impl ParseError {
    pub fn new(where_: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            where_: where_.into(),
            msg: msg.into(),
        }
    }
}

/// A value does not conform to its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{msg} (schema {schema:?})")]
pub struct EncodeError {
    /// Canonical schema string of the offending node.
    pub schema: String,
    /// Human-readable reason, including a rendering of the offending value.
    pub msg: String,
}

impl EncodeError {
    pub fn new(schema: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            msg: msg.into(),
        }
    }
}

/// Input bytes are malformed relative to their schema.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{msg} (schema {schema:?})")]
pub struct DecodeError {
    /// Canonical schema string of the offending node.
    pub schema: String,
    /// Human-readable reason.
    pub msg: String,
}

impl DecodeError {
    pub fn new(schema: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            msg: msg.into(),
        }
    }
}

/// A top-level argument had the wrong shape (not a schema, not a byte buffer, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{0}")]
pub struct ArgumentError(pub String);

/// The union of every error this crate's public entry points can raise.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Argument(#[from] ArgumentError),
}
