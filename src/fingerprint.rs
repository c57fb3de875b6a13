//! Lossy fingerprint keying the baby table.
//!
//! The table does not need a cryptographic digest, only speed and a uniform
//! spread: candidates it yields are always re-verified against the full
//! target key. The fingerprint is the high 32 bits of a seed-0 XXH64 over
//! the 33 raw bytes of a compressed point, stored on disk as its 8 lowercase
//! ASCII-hex characters.

use xxhash_rust::xxh64::xxh64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub u32);

impl Fingerprint {
    pub fn of_cpub(cpub: &[u8; 33]) -> Self {
        Fingerprint((xxh64(cpub, 0) >> 32) as u32)
    }

    /// The on-disk form: 8 lowercase hex characters.
    pub fn to_hex_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        let s = format!("{:08x}", self.0);
        out.copy_from_slice(s.as_bytes());
        out
    }

    /// Parse the on-disk form; `None` for anything that is not 8 hex chars.
    pub fn from_hex_bytes(bytes: &[u8; 8]) -> Option<Self> {
        let s = std::str::from_utf8(bytes).ok()?;
        u32::from_str_radix(s, 16).ok().map(Fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::curve::{compress, mul, G};
    use num_bigint::BigInt;

    #[test]
    fn empty_input_matches_published_xxh64_vector() {
        // XXH64("", seed 0) = 0xef46db3751d8e999
        assert_eq!(xxh64(&[], 0), 0xef46db3751d8e999);
        assert_eq!(
            Fingerprint((xxh64(&[], 0) >> 32) as u32).to_hex_bytes(),
            *b"ef46db37"
        );
    }

    #[test]
    fn deterministic_across_recomputation() {
        for k in [0u64, 1, 21, 1000, 999_983] {
            let cpub = compress(&mul(&BigInt::from(k), &G));
            assert_eq!(Fingerprint::of_cpub(&cpub), Fingerprint::of_cpub(&cpub));
        }
    }

    #[test]
    fn hex_round_trip() {
        for fp in [Fingerprint(0), Fingerprint(0xdeadbeef), Fingerprint(u32::MAX)] {
            let hex = fp.to_hex_bytes();
            assert!(hex.iter().all(|b| b.is_ascii_hexdigit()));
            assert_eq!(Fingerprint::from_hex_bytes(&hex), Some(fp));
        }
        assert_eq!(Fingerprint::from_hex_bytes(b"zzzzzzzz"), None);
    }

    #[test]
    fn nearby_points_get_distinct_fingerprints() {
        // not guaranteed in general, but a collision among the first few
        // multiples of G would mean the hash is badly broken
        let a = Fingerprint::of_cpub(&compress(&mul(&BigInt::from(1), &G)));
        let b = Fingerprint::of_cpub(&compress(&mul(&BigInt::from(2), &G)));
        let c = Fingerprint::of_cpub(&compress(&mul(&BigInt::from(3), &G)));
        assert!(a != b && b != c && a != c);
    }
}
