//! Curve parameter value object
//!
//! A [`CurveParams`] describes one short-Weierstrass curve
//! `y² = x³ + ax + b (mod p)` together with its generator and group order.
//! The engine never holds a global or default curve: every operation runs
//! against an explicit parameter value, which is what lets independently
//! configured callers coexist without copy-paste drift.

use crate::error::{validate, Error, Result};
use crate::field;
use crate::point::Point;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Immutable description of a short-Weierstrass curve over a prime field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveParams {
    p: BigUint,
    a: BigUint,
    b: BigUint,
    gx: BigUint,
    gy: BigUint,
    n: BigUint,
    cofactor: u32,
}

impl CurveParams {
    /// Create validated curve parameters.
    ///
    /// Checks that the field prime is odd and large enough for the curve
    /// form, that `a`, `b` and the generator coordinates are reduced, that
    /// the curve is non-singular (`4a³ + 27b² ≠ 0 mod p`), and that the
    /// generator satisfies the curve equation. The group-order invariant
    /// `n·G = Infinity` needs scalar multiplication and is checked by
    /// [`Curve::new`](crate::Curve::new).
    pub fn new(
        p: BigUint,
        a: BigUint,
        b: BigUint,
        gx: BigUint,
        gy: BigUint,
        n: BigUint,
        cofactor: u32,
    ) -> Result<Self> {
        validate::parameter(
            p > BigUint::from(3u32),
            "p",
            "field prime must exceed 3 for short Weierstrass form",
        )?;
        validate::parameter(p.bit(0), "p", "field prime must be odd")?;
        validate::parameter(a < p, "a", "coefficient must be reduced mod p")?;
        validate::parameter(b < p, "b", "coefficient must be reduced mod p")?;
        validate::parameter(gx < p, "Gx", "generator coordinate must be reduced mod p")?;
        validate::parameter(gy < p, "Gy", "generator coordinate must be reduced mod p")?;
        validate::parameter(n > BigUint::one(), "n", "group order must exceed 1")?;
        validate::parameter(cofactor >= 1, "cofactor", "cofactor must be at least 1")?;

        // Non-singularity: the discriminant factor 4a³ + 27b² must not vanish
        let a3 = field::mul(&field::mul(&a, &a, &p), &a, &p);
        let b2 = field::mul(&b, &b, &p);
        let discriminant = field::add(
            &field::mul(&BigUint::from(4u32), &a3, &p),
            &field::mul(&BigUint::from(27u32), &b2, &p),
            &p,
        );
        if discriminant.is_zero() {
            return Err(Error::param("a/b", "curve is singular: 4a^3 + 27b^2 = 0"));
        }

        let params = CurveParams {
            p,
            a,
            b,
            gx,
            gy,
            n,
            cofactor,
        };
        if !params.satisfies_equation(&params.gx, &params.gy) {
            return Err(Error::param("G", "generator does not lie on the curve"));
        }
        Ok(params)
    }

    /// The secp256k1 curve: `p = 2²⁵⁶ - 2³² - 977`, `a = 0`, `b = 7`.
    pub fn secp256k1() -> Self {
        let p = parse_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
        let a = BigUint::zero();
        let b = BigUint::from(7u32);
        let gx = parse_hex("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
        let gy = parse_hex("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8");
        let n = parse_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
        Self::new(p, a, b, gx, gy, n, 1).expect("secp256k1 parameters are valid")
    }

    /// Field prime `p`
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Curve coefficient `a`
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Curve coefficient `b`
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Group order `n` of the subgroup generated by `G`
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Cofactor `h`
    pub fn cofactor(&self) -> u32 {
        self.cofactor
    }

    /// The generator `G` as a point value
    pub fn generator(&self) -> Point {
        Point::Affine {
            x: self.gx.clone(),
            y: self.gy.clone(),
        }
    }

    /// Bit length of the field prime
    pub fn bit_length(&self) -> u64 {
        self.p.bits()
    }

    /// Byte length of one field element encoding (⌈bits(p)/8⌉)
    pub fn field_byte_length(&self) -> usize {
        ((self.p.bits() + 7) / 8) as usize
    }

    /// Byte length of one scalar encoding (⌈bits(n)/8⌉)
    pub fn scalar_byte_length(&self) -> usize {
        ((self.n.bits() + 7) / 8) as usize
    }

    pub(crate) fn satisfies_equation(&self, x: &BigUint, y: &BigUint) -> bool {
        let lhs = field::mul(y, y, &self.p);
        let x3 = field::mul(&field::mul(x, x, &self.p), x, &self.p);
        let rhs = field::add(
            &field::add(&x3, &field::mul(&self.a, x, &self.p), &self.p),
            &self.b,
            &self.p,
        );
        lhs == rhs
    }
}

fn parse_hex(digits: &str) -> BigUint {
    BigUint::parse_bytes(digits.as_bytes(), 16).expect("curve constant is valid hex")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // y² = x³ + 2x + 3 over F_97, G = (3, 6) of order 5 (curve has 100
    // points, so h = 20), used across the module tests because every value
    // is small enough to check by hand
    pub(crate) fn tiny_params() -> CurveParams {
        CurveParams::new(
            BigUint::from(97u32),
            BigUint::from(2u32),
            BigUint::from(3u32),
            BigUint::from(3u32),
            BigUint::from(6u32),
            BigUint::from(5u32),
            20,
        )
        .unwrap()
    }

    #[test]
    fn secp256k1_constants() {
        let params = CurveParams::secp256k1();
        assert_eq!(params.bit_length(), 256);
        assert_eq!(params.field_byte_length(), 32);
        assert_eq!(params.scalar_byte_length(), 32);
        assert_eq!(params.cofactor(), 1);

        // p = 2^256 - 2^32 - 977
        let two = BigUint::from(2u32);
        let expected = two.pow(256u32) - two.pow(32u32) - BigUint::from(977u32);
        assert_eq!(params.p(), &expected);
    }

    #[test]
    fn generator_must_lie_on_curve() {
        let err = CurveParams::new(
            BigUint::from(97u32),
            BigUint::from(2u32),
            BigUint::from(3u32),
            BigUint::from(3u32),
            BigUint::from(7u32), // (3, 7) is not on the curve
            BigUint::from(5u32),
            1,
        )
        .unwrap_err();
        assert_eq!(err, Error::param("G", "generator does not lie on the curve"));
    }

    #[test]
    fn singular_curve_rejected() {
        // a = 0, b = 0 gives discriminant 0
        assert!(CurveParams::new(
            BigUint::from(97u32),
            BigUint::zero(),
            BigUint::zero(),
            BigUint::from(3u32),
            BigUint::from(6u32),
            BigUint::from(5u32),
            1,
        )
        .is_err());
    }

    #[test]
    fn unreduced_coefficients_rejected() {
        assert!(CurveParams::new(
            BigUint::from(97u32),
            BigUint::from(99u32),
            BigUint::from(3u32),
            BigUint::from(3u32),
            BigUint::from(6u32),
            BigUint::from(5u32),
            1,
        )
        .is_err());
    }

    #[test]
    fn even_or_tiny_modulus_rejected() {
        let mk = |p: u32| {
            CurveParams::new(
                BigUint::from(p),
                BigUint::from(2u32),
                BigUint::from(3u32),
                BigUint::from(3u32),
                BigUint::from(6u32),
                BigUint::from(5u32),
                1,
            )
        };
        assert!(mk(98).is_err());
        assert!(mk(2).is_err());
    }
}
