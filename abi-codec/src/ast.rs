//! The ABI type AST (C1).
//!
//! `Type` is a plain, exhaustive sum type. There is no visitor/dynamic
//! dispatch: encoder and decoder each drive a single `match` over `Type`.

/// A parsed ABI type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `[u]intN`, `8 <= bits <= 256`, `bits % 8 == 0`.
    Integer { bits: u16, signed: bool },
    /// `[u]fixedMxN`, `8 <= bits <= 256`, `bits % 8 == 0`, `precision <= 80`.
    Fixed { bits: u16, precision: u8, signed: bool },
    /// `bytes` (`size: None`) or `bytesN`, `1 <= N <= 32` (`size: Some(N)`).
    Bytes { size: Option<u8> },
    /// `string`
    String,
    /// `T[]` (`length: None`) or `T[N]`, `N >= 1` (`length: Some(N)`).
    Array { element: Box<Type>, length: Option<u32> },
    /// `(T0,T1,...)`, zero or more components.
    Tuple { components: Vec<Type> },
}

impl Type {
    /// Convenience constructor for a dynamic array.
    pub fn array(element: Type, length: Option<u32>) -> Self {
        Type::Array {
            element: Box::new(element),
            length,
        }
    }

    /// Convenience constructor for a tuple.
    pub fn tuple(components: Vec<Type>) -> Self {
        Type::Tuple { components }
    }

    /// Whether this type's encoded length depends on the value being encoded.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Type::Address | Type::Bool | Type::Integer { .. } | Type::Fixed { .. } => false,
            Type::Bytes { size } => size.is_none(),
            Type::String => true,
            Type::Array { element, length } => length.is_none() || element.is_dynamic(),
            Type::Tuple { components } => components.iter().any(Type::is_dynamic),
        }
    }

    /// Number of bytes this type contributes to its enclosing head section.
    ///
    /// `32` for every atomic and every dynamic type (dynamic instances
    /// contribute a pointer). Static arrays/tuples sum their children.
    pub fn head_width(&self) -> u32 {
        if self.is_dynamic() {
            return 32;
        }
        match self {
            Type::Array { element, length } => {
                element.head_width() * length.expect("static array has a length")
            }
            Type::Tuple { components } => components.iter().map(Type::head_width).sum(),
            _ => 32,
        }
    }
}

impl Type {
    /// Encode `value` against this AST. Inherent counterpart of
    /// [`crate::encode`] for callers that already hold a parsed `Type` and
    /// want to encode many values against it without re-parsing.
    pub fn encode(&self, value: &crate::value::Value) -> Result<Vec<u8>, crate::error::EncodeError> {
        crate::encoder::encode(self, value)
    }

    /// Decode `bytes` against this AST. Inherent counterpart of
    /// [`crate::decode`].
    pub fn decode(
        &self,
        bytes: &[u8],
        options: &crate::decoder::DecodeOptions,
    ) -> Result<crate::value::Value, crate::error::DecodeError> {
        crate::decoder::decode(self, bytes, options)
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::formatter::format(self))
    }
}
