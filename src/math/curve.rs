//! secp256k1 field and curve primitives.
//!
//! Affine arithmetic over GF(p) with arbitrary-precision integers, sized for
//! a search tool rather than a signing library: no constant-time guarantees
//! beyond the uniform Montgomery-ladder access pattern.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

use crate::error::{Result, SolverError};

/// Prime of the base field: 2^256 - 2^32 - 977.
pub static P: Lazy<BigInt> = Lazy::new(|| {
    BigInt::parse_bytes(
        b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
        16,
    )
    .expect("constant parses")
});

/// Order of the generator point.
pub static N: Lazy<BigInt> = Lazy::new(|| {
    BigInt::parse_bytes(
        b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        16,
    )
    .expect("constant parses")
});

/// Generator point G.
pub static G: Lazy<Point> = Lazy::new(|| Point {
    x: BigInt::parse_bytes(
        b"79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
        16,
    )
    .expect("constant parses"),
    y: BigInt::parse_bytes(
        b"483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
        16,
    )
    .expect("constant parses"),
});

/// An affine curve point. The identity element is the sentinel (0, 0), which
/// is unambiguous because (0, 0) does not satisfy y^2 = x^3 + 7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub x: BigInt,
    pub y: BigInt,
}

impl Point {
    pub fn infinity() -> Self {
        Point {
            x: BigInt::zero(),
            y: BigInt::zero(),
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }
}

/// Affine point addition, covering the doubling and inverse-pair cases.
pub fn add(p: &Point, q: &Point) -> Point {
    if p.is_infinity() {
        return q.clone();
    }
    if q.is_infinity() {
        return p.clone();
    }

    let modulus: &BigInt = &P;
    let (num, den) = if p == q {
        if p.y.is_zero() {
            return Point::infinity();
        }
        (&p.x * &p.x * 3, &p.y * 2)
    } else {
        if p.x == q.x {
            // q = -p
            return Point::infinity();
        }
        (&q.y - &p.y, &q.x - &p.x)
    };

    // den is nonzero mod p on both branches above
    let inv = den
        .mod_floor(modulus)
        .modinv(modulus)
        .expect("nonzero denominator is invertible mod p");
    let lambda = (num * inv).mod_floor(modulus);
    let x = (&lambda * &lambda - &p.x - &q.x).mod_floor(modulus);
    let y = (lambda * (&p.x - &x) - &p.y).mod_floor(modulus);
    Point { x, y }
}

/// Scalar multiplication k*p via a Montgomery ladder scanned MSB to LSB.
/// The ladder maintains r1 - r0 = p throughout.
pub fn mul(k: &BigInt, p: &Point) -> Point {
    let mut r0 = Point::infinity();
    let mut r1 = p.clone();
    for i in (0..k.bits()).rev() {
        if k.bit(i) {
            r0 = add(&r0, &r1);
            r1 = add(&r1, &r1);
        } else {
            r1 = add(&r0, &r1);
            r0 = add(&r0, &r0);
        }
    }
    r0
}

pub fn neg(p: &Point) -> Point {
    if p.is_infinity() {
        return Point::infinity();
    }
    Point {
        x: p.x.clone(),
        y: (-&p.y).mod_floor(&P),
    }
}

pub fn sub(p: &Point, q: &Point) -> Point {
    add(p, &neg(q))
}

/// 33-byte compressed encoding: parity tag (0x02 even y, 0x03 odd y) then
/// the x coordinate as 32 big-endian bytes.
pub fn compress(p: &Point) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[0] = if p.y.is_even() { 0x02 } else { 0x03 };
    let (_, xb) = p.x.to_bytes_be();
    out[33 - xb.len()..].copy_from_slice(&xb);
    out
}

/// Recover the y coordinate for a compressed point. Works because
/// p = 3 mod 4, so sqrt(t) = t^((p+1)/4) whenever t is a quadratic residue.
pub fn decompress(parity: u8, x: &BigInt) -> Result<Point> {
    let modulus: &BigInt = &P;
    let t = (x * x * x + 7i32).mod_floor(modulus);
    let exp = (modulus + BigInt::one()) / 4;
    let mut y = t.modpow(&exp, modulus);
    if (&y * &y).mod_floor(modulus) != t {
        return Err(SolverError::InvalidPublicKey(
            "x coordinate is not on the curve".into(),
        ));
    }
    let want_even = parity == 0x02;
    if y.is_even() != want_even {
        y = modulus - y;
    }
    Ok(Point { x: x.clone(), y })
}

/// Parse and validate a compressed public key given as 66 hex characters.
pub fn parse_pubkey(pubkey: &str) -> Result<Point> {
    if pubkey.len() != 66 {
        return Err(SolverError::InvalidPublicKey(format!(
            "expected 66 hex characters, got {}",
            pubkey.len()
        )));
    }
    let bytes = hex::decode(pubkey)
        .map_err(|_| SolverError::InvalidPublicKey("not valid hex".into()))?;
    let parity = bytes[0];
    if parity != 0x02 && parity != 0x03 {
        return Err(SolverError::InvalidPublicKey(
            "prefix must be 02 or 03".into(),
        ));
    }
    let x = BigInt::from_bytes_be(Sign::Plus, &bytes[1..]);
    if x >= *P {
        return Err(SolverError::InvalidPublicKey(
            "x coordinate exceeds the field prime".into(),
        ));
    }
    decompress(parity, &x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TWO_G_X: &str = "C6047F9441ED7D6D3045406E95C07CD85C778E4B8CEF3CA7ABAC09B95C709EE5";
    const TWO_G_Y: &str = "1AE168FEA63DC339A3C58419466CEAEEF7F632653266D0E1236431A950CFE52A";

    fn bigint(hexstr: &str) -> BigInt {
        BigInt::parse_bytes(hexstr.as_bytes(), 16).unwrap()
    }

    #[test]
    fn generator_compresses_to_known_vector() {
        assert_eq!(
            hex::encode(compress(&G)),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn doubling_branch_matches_known_two_g() {
        let two_g = add(&G, &G);
        assert_eq!(two_g.x, bigint(TWO_G_X));
        assert_eq!(two_g.y, bigint(TWO_G_Y));
        assert_eq!(mul(&BigInt::from(2), &G), two_g);
    }

    #[test]
    fn scalar_mul_boundaries() {
        assert!(mul(&BigInt::zero(), &G).is_infinity());
        assert_eq!(mul(&BigInt::one(), &G), *G);
        assert_eq!(mul(&(&*N - 1), &G), neg(&G));
        assert!(mul(&N, &G).is_infinity());
    }

    #[test]
    fn inverse_pairs_cancel() {
        for k in [1u64, 2, 7, 1_000_003] {
            let p = mul(&BigInt::from(k), &G);
            assert!(sub(&p, &p).is_infinity());
            assert!(add(&p, &neg(&p)).is_infinity());
        }
    }

    #[test]
    fn addition_is_homomorphic_over_scalars() {
        let mut rng = StdRng::seed_from_u64(0xb5b5);
        for _ in 0..100 {
            let a = BigInt::from(rng.gen::<u64>());
            let b = BigInt::from(rng.gen::<u64>());
            let sum = add(&mul(&a, &G), &mul(&b, &G));
            assert_eq!(sum, mul(&((a + b).mod_floor(&N)), &G));
        }
    }

    #[test]
    fn multiples_satisfy_curve_equation() {
        let mut rng = StdRng::seed_from_u64(0x51ec);
        for _ in 0..20 {
            let k = BigInt::from(rng.gen_range(1u64..u64::MAX));
            let p = mul(&k, &G);
            let lhs = (&p.y * &p.y).mod_floor(&P);
            let rhs = (&p.x * &p.x * &p.x + 7i32).mod_floor(&P);
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn compress_decompress_round_trips_both_parities() {
        let mut seen_even = false;
        let mut seen_odd = false;
        for k in 1u64..=20 {
            let p = mul(&BigInt::from(k), &G);
            if p.y.is_even() {
                seen_even = true;
            } else {
                seen_odd = true;
            }
            let cpub = compress(&p);
            let x = BigInt::from_bytes_be(Sign::Plus, &cpub[1..]);
            assert_eq!(decompress(cpub[0], &x).unwrap(), p);
        }
        assert!(seen_even && seen_odd);
    }

    #[test]
    fn decompress_rejects_off_curve_x() {
        // roughly half of all x values have no square root for x^3 + 7;
        // scan small x until one fails
        let mut rejected = false;
        for x in 2u64..64 {
            if decompress(0x02, &BigInt::from(x)).is_err() {
                rejected = true;
                break;
            }
        }
        assert!(rejected, "no off-curve x found in scan range");
    }

    #[test]
    fn parse_pubkey_rejects_malformed_input() {
        // wrong length
        assert!(parse_pubkey("02abcd").is_err());
        // uncompressed prefix
        assert!(parse_pubkey(
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        )
        .is_err());
        // non-hex characters
        assert!(parse_pubkey(
            "02zzbe667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        )
        .is_err());
    }

    #[test]
    fn parse_pubkey_accepts_generator() {
        let g = parse_pubkey("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap();
        assert_eq!(g, *G);
    }

    #[test]
    fn ladder_matches_k256_reference() {
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        use k256::elliptic_curve::PrimeField;
        use k256::{ProjectivePoint, Scalar};

        let mut rng = StdRng::seed_from_u64(0x6b32);
        for _ in 0..25 {
            let k: u128 = rng.gen_range(1..u128::MAX);
            let ours = compress(&mul(&BigInt::from(k), &G));

            let mut repr = [0u8; 32];
            repr[16..].copy_from_slice(&k.to_be_bytes());
            let scalar = Scalar::from_repr(repr.into()).unwrap();
            let theirs = (ProjectivePoint::GENERATOR * scalar)
                .to_affine()
                .to_encoded_point(true);
            assert_eq!(ours.as_slice(), theirs.as_bytes());
        }
    }
}
