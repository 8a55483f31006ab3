//! Schema parser (C2): schema string -> [`Type`].

use crate::ast::Type;
use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;

/// `bytesN`, `[u]fixedMxN`, `[u]intM` in one pass, mirroring the single
/// `VALUE_PATTERN` regex of the `eth-stdlib` parser this was distilled from.
static VALUE_ATOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^bytes(?P<bytes_n>\d+)$|^(?P<fixed_u>u?)fixed(?P<fixed_bits>\d+)x(?P<fixed_prec>\d+)$|^(?P<int_u>u?)int(?P<int_bits>\d+)$")
        .expect("static regex is valid")
});

/// `<subtype>[<N?>]`, anchored, greedy so nested arrays peel off one
/// bracket pair per recursive call.
static ARRAY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<subtype>.+)\[(?P<len>\d*)\]$").expect("static regex is valid")
});

/// Parse a schema string into a [`Type`].
pub fn parse(schema: &str) -> Result<Type, ParseError> {
    parse_type(schema)
}

/// Parse a schema string that must not be the empty tuple `()`.
///
/// Used for array elements and tuple components, where a zero-arity tuple
/// is explicitly disallowed even though it is a valid top-level schema.
fn parse_component(schema: &str) -> Result<Type, ParseError> {
    let ty = parse_type(schema)?;
    if matches!(&ty, Type::Tuple { components } if components.is_empty()) {
        return Err(ParseError::new(
            schema,
            "'()' cannot be used as an array element or tuple component",
        ));
    }
    Ok(ty)
}

fn parse_type(schema: &str) -> Result<Type, ParseError> {
    // 1. literal atomics
    match schema {
        "address" => return Ok(Type::Address),
        "bool" => return Ok(Type::Bool),
        "bytes" => return Ok(Type::Bytes { size: None }),
        "string" => return Ok(Type::String),
        "()" => return Ok(Type::tuple(Vec::new())),
        _ => {}
    }

    // 2. value atomics: bytesN, [u]fixedMxN, [u]intM
    if let Some(caps) = VALUE_ATOM.captures(schema) {
        if let Some(n) = caps.name("bytes_n") {
            let size: u32 = n.as_str().parse().expect("digits");
            if !(1..=32).contains(&size) {
                return Err(ParseError::new(
                    schema,
                    format!("'{size}' is not a valid byte array width"),
                ));
            }
            return Ok(Type::Bytes {
                size: Some(size as u8),
            });
        }
        if let Some(bits_m) = caps.name("fixed_bits") {
            let bits: u32 = bits_m.as_str().parse().expect("digits");
            let precision: u32 = caps["fixed_prec"].parse().expect("digits");
            if bits < 8 || bits > 256 || bits % 8 != 0 {
                return Err(ParseError::new(
                    schema,
                    format!("'{bits}' is not a valid fixed point width"),
                ));
            }
            if precision > 80 {
                return Err(ParseError::new(
                    schema,
                    format!("'{precision}' is not a valid fixed point precision"),
                ));
            }
            let signed = &caps["fixed_u"] != "u";
            return Ok(Type::Fixed {
                bits: bits as u16,
                precision: precision as u8,
                signed,
            });
        }
        if let Some(bits_m) = caps.name("int_bits") {
            let bits: u32 = bits_m.as_str().parse().expect("digits");
            if bits < 8 || bits > 256 || bits % 8 != 0 {
                return Err(ParseError::new(
                    schema,
                    format!("'{bits}' is not a valid integer width"),
                ));
            }
            let signed = &caps["int_u"] != "u";
            return Ok(Type::Integer {
                bits: bits as u16,
                signed,
            });
        }
    }

    // 3. array suffix
    if let Some(caps) = ARRAY_SUFFIX.captures(schema) {
        let subtype = &caps["subtype"];
        let len_str = &caps["len"];
        let length = if len_str.is_empty() {
            None
        } else {
            let n: u32 = len_str.parse().expect("digits");
            if n == 0 {
                return Err(ParseError::new(schema, "'0' is not a valid array size"));
            }
            Some(n)
        };
        let element = parse_component(subtype)?;
        return Ok(Type::array(element, length));
    }

    // 4. tuple
    if schema.starts_with('(') && schema.ends_with(')') {
        let inner = &schema[1..schema.len() - 1];
        if inner.is_empty() {
            // "()"  is handled above; this branch covers malformed cases like
            // a schema that merely looks tuple-shaped after stripping, e.g. never reached.
            return Ok(Type::tuple(Vec::new()));
        }
        let mut components = Vec::new();
        for part in split_top_level(inner) {
            if part.is_empty() {
                return Err(ParseError::new(
                    schema,
                    "Dangling comma detected in type string",
                ));
            }
            components.push(parse_component(part)?);
        }
        return Ok(Type::tuple(components));
    }

    Err(ParseError::new(schema, "ABI type not parseable"))
}

/// Split a tuple's inner type list on commas at parenthesis depth 0,
/// preserving nested tuples intact.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut parts = Vec::new();
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
