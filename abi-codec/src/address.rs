//! Address utilities (C7): Keccak-256 and EIP-55 checksumming.
//!
//! Pure functions, no shared state. Needed by the `Address` handling in
//! [`crate::encoder`] and [`crate::decoder`] and exposed publicly since
//! callers routinely need them independent of a full encode/decode round trip.

use tiny_keccak::{Hasher, Keccak};

/// The Keccak-256 digest (Ethereum's pre-SHA-3 variant, not NIST SHA3-256).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// EIP-55 mixed-case checksum encoding of a 20-byte address.
///
/// Lowercase-hexes `addr`, hashes the lowercase hex string's ASCII bytes,
/// and uppercases each hex digit of the address whose corresponding hash
/// nibble is `>= 8`.
pub fn checksum_encode(addr: &[u8; 20]) -> String {
    let lower = hex::encode(addr);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        if c.is_ascii_digit() {
            out.push(c);
            continue;
        }
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_of_empty_input() {
        let digest = keccak256(b"");
        assert_eq!(
            hex::encode(digest),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn checksum_matches_eip55_test_vectors() {
        let cases = [
            ("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            ("fb6916095ca1df60bb79ce92ce3ea74c37c5d359", "fB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"),
            ("dbf03b407c01e7cd3cbea99509d93f8dddc8c6fb", "dbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB"),
            ("d1220a0cf47c7b9be7a2e6ba89f429762e7b9adb", "D1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb"),
        ];
        for (lower_hex, expected) in cases {
            let bytes = hex::decode(lower_hex).unwrap();
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&bytes);
            assert_eq!(checksum_encode(&addr), format!("0x{expected}"));
        }
    }
}
