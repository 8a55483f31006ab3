//! Canonical schema formatter (C3): [`Type`] -> schema string.
//!
//! The inverse of [`crate::parser::parse`]: `parse(&format(ty)) == Ok(ty)`
//! for every `ty`.

use crate::ast::Type;

/// Render a [`Type`] as its canonical schema string.
pub fn format(ty: &Type) -> String {
    match ty {
        Type::Address => "address".to_string(),
        Type::Bool => "bool".to_string(),
        Type::Integer { bits, signed } => {
            if *signed {
                format!("int{bits}")
            } else {
                format!("uint{bits}")
            }
        }
        Type::Fixed { bits, precision, signed } => {
            if *signed {
                format!("fixed{bits}x{precision}")
            } else {
                format!("ufixed{bits}x{precision}")
            }
        }
        Type::Bytes { size: None } => "bytes".to_string(),
        Type::Bytes { size: Some(n) } => format!("bytes{n}"),
        Type::String => "string".to_string(),
        Type::Array { element, length } => match length {
            Some(n) => format!("{}[{n}]", format(element)),
            None => format!("{}[]", format(element)),
        },
        Type::Tuple { components } => {
            let inner: Vec<String> = components.iter().map(format).collect();
            format!("({})", inner.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn formats_atomics() {
        assert_eq!(format(&Type::Address), "address");
        assert_eq!(format(&Type::Bool), "bool");
        assert_eq!(format(&Type::String), "string");
        assert_eq!(format(&Type::Bytes { size: None }), "bytes");
        assert_eq!(format(&Type::tuple(vec![])), "()");
    }

    #[test]
    fn formats_value_atomics() {
        assert_eq!(
            format(&Type::Integer { bits: 256, signed: false }),
            "uint256"
        );
        assert_eq!(format(&Type::Integer { bits: 8, signed: true }), "int8");
        assert_eq!(format(&Type::Bytes { size: Some(32) }), "bytes32");
        assert_eq!(
            format(&Type::Fixed { bits: 128, precision: 18, signed: true }),
            "fixed128x18"
        );
        assert_eq!(
            format(&Type::Fixed { bits: 128, precision: 18, signed: false }),
            "ufixed128x18"
        );
    }

    #[test]
    fn formats_arrays_and_tuples() {
        assert_eq!(
            format(&Type::array(Type::Integer { bits: 256, signed: false }, None)),
            "uint256[]"
        );
        assert_eq!(
            format(&Type::array(Type::String, Some(3))),
            "string[3]"
        );
        assert_eq!(
            format(&Type::tuple(vec![Type::Bool, Type::String])),
            "(bool,string)"
        );
    }

    #[test]
    fn roundtrips_through_parse() {
        for schema in [
            "address",
            "bool",
            "uint256",
            "int8",
            "bytes32",
            "ufixed128x18",
            "string[]",
            "uint256[3]",
            "string[][3]",
            "(uint8,string,uint8)",
            "(uint8,(bool,bool))",
        ] {
            let ty = parse(schema).unwrap();
            assert_eq!(format(&ty), schema);
        }
    }
}
