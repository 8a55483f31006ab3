//! Property tests for the specification's §8 testable properties.
//!
//! `proptest` explores the `Type` shape space (leaf types, then recursive
//! arrays/tuples up to a bounded depth); for each generated `Type` a
//! structurally-valid `Value` is synthesized with a seeded `rand` RNG rather
//! than a second nested `Strategy`, since a `Value` must match the shape of
//! whatever `Type` proptest already picked (one random number generator
//! driving a recursive sampler is simpler than composing that dependency
//! into the `Strategy` tree).

use crate::ast::Type;
use crate::decoder::{decode, DecodeOptions};
use crate::encoder::{encode, integer_bounds};
use crate::formatter::format;
use crate::parser::parse;
use crate::value::Value;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_DEPTH: u32 = 3;

fn leaf_type() -> BoxedStrategy<Type> {
    prop_oneof![
        Just(Type::Address),
        Just(Type::Bool),
        (1u16..=32, any::<bool>()).prop_map(|(n, signed)| Type::Integer { bits: n * 8, signed }),
        (1u16..=32, 0u8..=18, any::<bool>())
            .prop_map(|(n, precision, signed)| Type::Fixed { bits: n * 8, precision, signed }),
        (1u8..=32).prop_map(|n| Type::Bytes { size: Some(n) }),
        Just(Type::Bytes { size: None }),
        Just(Type::String),
    ]
    .boxed()
}

/// A `Type` that may legally appear as an array element or tuple component
/// (i.e. never the zero-arity tuple).
fn component_type() -> BoxedStrategy<Type> {
    leaf_type()
        .prop_recursive(MAX_DEPTH, 16, 3, |inner| {
            prop_oneof![
                (inner.clone(), 0u32..=3)
                    .prop_map(|(e, n)| Type::array(e, if n == 0 { None } else { Some(n) })),
                proptest::collection::vec(inner, 1..=3).prop_map(Type::tuple),
            ]
            .boxed()
        })
        .boxed()
}

/// Any top-level schema, including the zero-arity tuple `()`.
fn arb_type() -> BoxedStrategy<Type> {
    prop_oneof![9 => component_type(), 1 => Just(Type::tuple(Vec::new()))].boxed()
}

fn random_bigint_in_range(rng: &mut StdRng, lo: &BigInt, hi: &BigInt) -> BigInt {
    let span = hi - lo + BigInt::from(1);
    let byte_len = (span.bits() as usize) / 8 + 2;
    let mut bytes = vec![0u8; byte_len];
    rng.fill(bytes.as_mut_slice());
    let raw = BigInt::from_bytes_be(Sign::Plus, &bytes);
    lo + (raw % &span)
}

fn random_ascii(rng: &mut StdRng, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

fn random_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    rng.fill(out.as_mut_slice());
    out
}

/// Synthesize a `Value` that structurally matches `ty`, for use in the
/// universal round-trip property below. Addresses are sampled already
/// lowercase, so no separate `v_normalized` step is needed for equality.
fn sample_value(ty: &Type, rng: &mut StdRng) -> Value {
    match ty {
        Type::Address => Value::Address(format!("0x{}", hex::encode(random_bytes(rng, 20)))),
        Type::Bool => Value::Bool(rng.gen()),
        Type::Integer { bits, signed } => {
            let (lo, hi) = integer_bounds(*bits, *signed);
            Value::Int(random_bigint_in_range(rng, &lo, &hi))
        }
        Type::Fixed { bits, precision, signed } => {
            let (lo, hi) = integer_bounds(*bits, *signed);
            let scaled = random_bigint_in_range(rng, &lo, &hi);
            Value::Fixed(BigDecimal::new(scaled, *precision as i64))
        }
        Type::Bytes { size: Some(n) } => Value::Bytes(random_bytes(rng, *n as usize)),
        Type::Bytes { size: None } => {
            let n = rng.gen_range(0..=40);
            Value::Bytes(random_bytes(rng, n))
        }
        Type::String => Value::Str(random_ascii(rng, 20)),
        Type::Array { element, length } => {
            let n = length.unwrap_or_else(|| rng.gen_range(0..=3)) as usize;
            Value::Array((0..n).map(|_| sample_value(element, rng)).collect())
        }
        Type::Tuple { components } => {
            Value::Tuple(components.iter().map(|c| sample_value(c, rng)).collect())
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// `decode(format(T), encode(format(T), v), {checksum:false}) == v` for
    /// every generated `(T, v)` pair.
    #[test]
    fn universal_round_trip(ty in arb_type(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let value = sample_value(&ty, &mut rng);
        let bytes = encode(&ty, &value).expect("sampled value conforms to its own type");
        let decoded = decode(&ty, &bytes, &DecodeOptions { checksum: false, lossy_strings: false })
            .expect("bytes produced by our own encoder must decode");
        prop_assert_eq!(decoded, value);
    }

    /// `parse(format(T)) == T` for every generated `T`.
    #[test]
    fn parser_round_trip(ty in arb_type()) {
        let schema = format(&ty);
        let reparsed = parse(&schema).expect("formatter output must reparse");
        prop_assert_eq!(reparsed, ty);
    }

    /// Every 32-byte word with a nonzero bit outside an atomic type's domain
    /// is rejected, never silently masked.
    #[test]
    fn padding_strictness(n_bytes in 1u16..=32, signed in any::<bool>(), seed in any::<u64>()) {
        let ty = Type::Integer { bits: n_bytes * 8, signed };
        let mut rng = StdRng::seed_from_u64(seed);
        let mut word = [0u8; 32];
        let zero_bytes = 32 - n_bytes as usize;
        if zero_bytes > 0 {
            // flip a bit strictly outside the type's domain
            let idx = rng.gen_range(0..zero_bytes);
            word[idx] = 1 << rng.gen_range(0..8);
            prop_assert!(decode(&ty, &word, &DecodeOptions::default()).is_err());
        }
    }

    /// A dynamic `bytes`/`string` whose declared length exceeds the
    /// remaining buffer always errors.
    #[test]
    fn length_prefix_strictness(declared in 1u64..=64, shortfall in 1u64..=32) {
        let ty = Type::Bytes { size: None };
        let mut bytes = encode(&ty, &Value::Bytes(vec![0u8; declared as usize])).unwrap();
        let keep = bytes.len().saturating_sub(shortfall as usize).max(32);
        bytes.truncate(keep);
        // the declared length in the first word still claims `declared`
        // bytes follow, which the truncated buffer can no longer supply.
        if (bytes.len() as u64) < 32 + declared {
            prop_assert!(decode(&ty, &bytes, &DecodeOptions::default()).is_err());
        }
    }
}
