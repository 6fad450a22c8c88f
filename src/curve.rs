//! Group law and scalar multiplication
//!
//! [`Curve`] binds a [`CurveParams`] value to the operations on it: curve
//! membership, negation, addition, doubling and double-and-add scalar
//! multiplication. Construction also builds a read-only table of generator
//! doublings (`G, 2G, 4G, ...`) so base-point multiplications skip the
//! doubling half of the loop; the table is never mutated afterwards, which
//! keeps a `Curve` freely shareable across threads.
//!
//! The double-and-add loop branches on scalar bits and is therefore not
//! constant-time. That matches the functional contract here; a Montgomery
//! ladder is the known hardening if timing adversaries enter the picture.

use crate::error::{validate, Error, Result};
use crate::field;
use crate::params::CurveParams;
use crate::point::Point;
use num_bigint::BigUint;
use num_traits::Zero;

/// A curve handle: parameters plus the precomputed generator doublings
#[derive(Clone, Debug)]
pub struct Curve {
    params: CurveParams,
    base_doublings: Vec<Point>,
}

impl Curve {
    /// Bind parameters to a usable curve.
    ///
    /// Builds the generator-doubling table and verifies the remaining
    /// parameter invariant `n·G = Infinity`, which [`CurveParams::new`]
    /// cannot check on its own.
    pub fn new(params: CurveParams) -> Result<Self> {
        let mut curve = Curve {
            params,
            base_doublings: Vec::new(),
        };

        let bits = curve.params.n().bits() as usize;
        let mut table = Vec::with_capacity(bits);
        table.push(curve.params.generator());
        for i in 1..bits {
            let next = curve.double(&table[i - 1]);
            table.push(next);
        }
        curve.base_doublings = table;

        // n·G must close the cycle; anything else means p/n/G disagree.
        // multiply reduces its scalar mod n, which would turn this check
        // into 0·G = Infinity, so walk the doubling table directly.
        let n = curve.params.n();
        let mut ng = Point::Identity;
        for i in 0..n.bits() {
            if n.bit(i) {
                ng = curve.add(&ng, &curve.base_doublings[i as usize]);
            }
        }
        if !ng.is_identity() {
            return Err(Error::param("n", "n * G is not the point at infinity"));
        }
        Ok(curve)
    }

    /// Convenience constructor for the secp256k1 curve
    pub fn secp256k1() -> Self {
        Self::new(CurveParams::secp256k1()).expect("secp256k1 parameters are valid")
    }

    /// The bound parameter value
    pub fn params(&self) -> &CurveParams {
        &self.params
    }

    /// The generator `G`
    pub fn generator(&self) -> Point {
        self.params.generator()
    }

    /// Curve membership. The identity is on every curve; an affine pair is
    /// on-curve iff `y² ≡ x³ + ax + b (mod p)`.
    pub fn is_on_curve(&self, point: &Point) -> bool {
        match point {
            Point::Identity => true,
            Point::Affine { x, y } => self.params.satisfies_equation(x, y),
        }
    }

    /// Group negation: `Infinity ↦ Infinity`, `(x, y) ↦ (x, p - y)`
    pub fn negate(&self, point: &Point) -> Point {
        match point {
            Point::Identity => Point::Identity,
            Point::Affine { x, y } => Point::Affine {
                x: x.clone(),
                y: field::sub(&BigUint::zero(), y, self.params.p()),
            },
        }
    }

    /// Group addition.
    ///
    /// Case order: identity on either side, equal points (doubling), mutual
    /// negatives (same `x`, different `y`), then the general chord formula.
    pub fn add(&self, p: &Point, q: &Point) -> Point {
        let (px, py) = match p {
            Point::Identity => return q.clone(),
            Point::Affine { x, y } => (x, y),
        };
        let (qx, qy) = match q {
            Point::Identity => return p.clone(),
            Point::Affine { x, y } => (x, y),
        };

        let modulus = self.params.p();
        if px == qx {
            if py == qy {
                return self.double(p);
            }
            // same x, distinct y: the points are mutual negatives
            return Point::Identity;
        }

        // slope = (qy - py) / (qx - px)
        let dx_inv = field::inverse(&field::sub(qx, px, modulus), modulus)
            .expect("qx - px is non-zero for distinct x-coordinates");
        let slope = field::mul(&field::sub(qy, py, modulus), &dx_inv, modulus);

        let x3 = field::sub(
            &field::sub(&field::mul(&slope, &slope, modulus), px, modulus),
            qx,
            modulus,
        );
        let y3 = field::sub(
            &field::mul(&slope, &field::sub(px, &x3, modulus), modulus),
            py,
            modulus,
        );
        Point::Affine { x: x3, y: y3 }
    }

    /// Point doubling. The identity and points with `y = 0` (vertical
    /// tangent) double to the identity.
    pub fn double(&self, point: &Point) -> Point {
        let (px, py) = match point {
            Point::Identity => return Point::Identity,
            Point::Affine { x, y } => (x, y),
        };
        if py.is_zero() {
            return Point::Identity;
        }

        let modulus = self.params.p();

        // slope = (3x² + a) / (2y)
        let x_sq = field::mul(px, px, modulus);
        let numerator = field::add(
            &field::mul(&BigUint::from(3u32), &x_sq, modulus),
            self.params.a(),
            modulus,
        );
        let two_y_inv = field::inverse(&field::add(py, py, modulus), modulus)
            .expect("2y is non-zero for y != 0 and odd p");
        let slope = field::mul(&numerator, &two_y_inv, modulus);

        let x3 = field::sub(
            &field::sub(&field::mul(&slope, &slope, modulus), px, modulus),
            px,
            modulus,
        );
        let y3 = field::sub(
            &field::mul(&slope, &field::sub(px, &x3, modulus), modulus),
            py,
            modulus,
        );
        Point::Affine { x: x3, y: y3 }
    }

    /// Scalar multiplication `k·P` by double-and-add.
    ///
    /// `k` is reduced mod `n` first (multiples of the group order contribute
    /// nothing); a reduced scalar of zero or an identity input short-circuits
    /// to the identity. Cost is `O(log n)` group operations.
    pub fn multiply(&self, k: &BigUint, point: &Point) -> Point {
        let k = k % self.params.n();
        if k.is_zero() || point.is_identity() {
            return Point::Identity;
        }

        let mut result = Point::Identity;
        let mut addend = point.clone();
        let bits = k.bits();
        for i in 0..bits {
            if k.bit(i) {
                result = self.add(&result, &addend);
            }
            if i + 1 < bits {
                addend = self.double(&addend);
            }
        }
        result
    }

    /// Scalar multiplication against the generator, served from the
    /// precomputed doubling table.
    pub fn multiply_base(&self, k: &BigUint) -> Point {
        let k = k % self.params.n();
        if k.is_zero() {
            return Point::Identity;
        }

        let mut result = Point::Identity;
        for i in 0..k.bits() {
            if k.bit(i) {
                result = self.add(&result, &self.base_doublings[i as usize]);
            }
        }
        result
    }

    /// Reject points that arrive from outside the engine.
    ///
    /// Every externally supplied public point must pass this before any group
    /// operation consumes it: an unvalidated point enables small-subgroup and
    /// invalid-curve attacks.
    pub fn validate_external_point(&self, point: &Point, context: &'static str) -> Result<()> {
        if !self.is_on_curve(point) {
            return Err(Error::PointNotOnCurve { context });
        }
        if point.is_identity() {
            return Err(Error::PointAtInfinity { context });
        }
        Ok(())
    }

    /// Decode an uncompressed point (`0x04 || x || y`).
    ///
    /// An all-zero buffer decodes to the identity. Affine coordinates are
    /// checked against the curve equation.
    pub fn point_from_uncompressed(&self, bytes: &[u8]) -> Result<Point> {
        let field_len = self.params.field_byte_length();
        validate::length("uncompressed point", bytes.len(), 1 + 2 * field_len)?;

        if bytes.iter().all(|&b| b == 0) {
            return Ok(Point::Identity);
        }
        if bytes[0] != 0x04 {
            return Err(Error::param(
                "point",
                "invalid uncompressed point prefix (expected 0x04)",
            ));
        }

        let x = BigUint::from_bytes_be(&bytes[1..1 + field_len]);
        let y = BigUint::from_bytes_be(&bytes[1 + field_len..]);
        if &x >= self.params.p() || &y >= self.params.p() {
            return Err(Error::param("point", "coordinate exceeds field prime"));
        }
        if !self.params.satisfies_equation(&x, &y) {
            return Err(Error::PointNotOnCurve {
                context: "uncompressed point decoding",
            });
        }
        Ok(Point::Affine { x, y })
    }

    /// Decode a compressed point (`0x02/0x03 || x`), recovering `y` from the
    /// curve equation and the parity prefix.
    pub fn point_from_compressed(&self, bytes: &[u8]) -> Result<Point> {
        let field_len = self.params.field_byte_length();
        validate::length("compressed point", bytes.len(), 1 + field_len)?;

        if bytes.iter().all(|&b| b == 0) {
            return Ok(Point::Identity);
        }
        let tag = bytes[0];
        if tag != 0x02 && tag != 0x03 {
            return Err(Error::param("point", "invalid compressed point prefix"));
        }

        let modulus = self.params.p();
        let x = BigUint::from_bytes_be(&bytes[1..]);
        if &x >= modulus {
            return Err(Error::param("point", "coordinate exceeds field prime"));
        }

        // rhs = x³ + ax + b
        let x3 = field::mul(&field::mul(&x, &x, modulus), &x, modulus);
        let rhs = field::add(
            &field::add(&x3, &field::mul(self.params.a(), &x, modulus), modulus),
            self.params.b(),
            modulus,
        );
        let y = field::sqrt(&rhs, modulus).ok_or(Error::PointNotOnCurve {
            context: "compressed point decoding",
        })?;

        // y = 0 is its own negative, so an odd-parity request for it is
        // unsatisfiable rather than a flip
        if y.is_zero() && tag == 0x03 {
            return Err(Error::param("point", "no odd y exists for this x"));
        }
        let y = if y.bit(0) == (tag == 0x03) {
            y
        } else {
            field::sub(&BigUint::zero(), &y, modulus)
        };
        Ok(Point::Affine { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tests::tiny_params;

    fn tiny_curve() -> Curve {
        Curve::new(tiny_params()).unwrap()
    }

    fn affine(x: u32, y: u32) -> Point {
        Point::Affine {
            x: BigUint::from(x),
            y: BigUint::from(y),
        }
    }

    #[test]
    fn known_multiples_of_generator() {
        // On y² = x³ + 2x + 3 over F_97 with G = (3, 6):
        // 2G = (80, 10), 3G = (80, 87), 4G = (3, 91), 5G = O
        let curve = tiny_curve();
        let g = curve.generator();

        assert_eq!(curve.double(&g), affine(80, 10));
        assert_eq!(curve.add(&curve.double(&g), &g), affine(80, 87));
        assert_eq!(curve.multiply(&BigUint::from(4u32), &g), affine(3, 91));
        assert!(curve.multiply(&BigUint::from(5u32), &g).is_identity());
    }

    #[test]
    fn add_case_analysis() {
        let curve = tiny_curve();
        let g = curve.generator();
        let g2 = curve.double(&g);

        // identity on either side
        assert_eq!(curve.add(&Point::Identity, &g), g);
        assert_eq!(curve.add(&g, &Point::Identity), g);

        // equal points route through doubling
        assert_eq!(curve.add(&g, &g), g2);

        // mutual negatives cancel: (3, 6) + (3, 91) = O
        assert!(curve.add(&g, &curve.negate(&g)).is_identity());

        // commutativity on a general pair
        assert_eq!(curve.add(&g, &g2), curve.add(&g2, &g));
    }

    #[test]
    fn doubling_vertical_tangent() {
        let curve = tiny_curve();
        // (30, 0) lies on the curve; its tangent is vertical
        let p = affine(30, 0);
        assert!(curve.is_on_curve(&p));
        assert!(curve.double(&p).is_identity());
        assert!(curve.double(&Point::Identity).is_identity());
    }

    #[test]
    fn negate_identity_and_zero_y() {
        let curve = tiny_curve();
        assert!(curve.negate(&Point::Identity).is_identity());
        // -(30, 0) = (30, 0)
        assert_eq!(curve.negate(&affine(30, 0)), affine(30, 0));
    }

    #[test]
    fn membership_check() {
        let curve = tiny_curve();
        assert!(curve.is_on_curve(&Point::Identity));
        assert!(curve.is_on_curve(&affine(3, 6)));
        assert!(!curve.is_on_curve(&affine(3, 7)));
    }

    #[test]
    fn multiply_identities_and_order_reduction() {
        let curve = tiny_curve();
        let g = curve.generator();

        assert!(curve.multiply(&BigUint::zero(), &g).is_identity());
        assert_eq!(curve.multiply(&BigUint::from(1u32), &g), g);
        assert!(curve
            .multiply(&BigUint::from(7u32), &Point::Identity)
            .is_identity());

        // k ≡ k mod n: 7·G = 2·G for n = 5
        assert_eq!(
            curve.multiply(&BigUint::from(7u32), &g),
            curve.multiply(&BigUint::from(2u32), &g)
        );
    }

    #[test]
    fn base_table_agrees_with_generic_multiply() {
        let curve = tiny_curve();
        let g = curve.generator();
        for k in 0u32..12 {
            let k = BigUint::from(k);
            assert_eq!(curve.multiply_base(&k), curve.multiply(&k, &g));
        }
    }

    #[test]
    fn bad_group_order_rejected() {
        let params = CurveParams::new(
            BigUint::from(97u32),
            BigUint::from(2u32),
            BigUint::from(3u32),
            BigUint::from(3u32),
            BigUint::from(6u32),
            BigUint::from(7u32), // true order of (3, 6) is 5
            1,
        )
        .unwrap();
        assert_eq!(
            Curve::new(params).unwrap_err(),
            Error::param("n", "n * G is not the point at infinity")
        );
    }

    #[test]
    fn uncompressed_roundtrip_and_rejection() {
        let curve = tiny_curve();
        let g = curve.generator();
        let field_len = curve.params().field_byte_length();

        let bytes = g.to_uncompressed_bytes(field_len);
        assert_eq!(curve.point_from_uncompressed(&bytes).unwrap(), g);

        // identity convention
        let id_bytes = Point::Identity.to_uncompressed_bytes(field_len);
        assert!(curve
            .point_from_uncompressed(&id_bytes)
            .unwrap()
            .is_identity());

        // off-curve coordinates must not decode
        let off = affine(3, 7).to_uncompressed_bytes(field_len);
        assert_eq!(
            curve.point_from_uncompressed(&off).unwrap_err(),
            Error::PointNotOnCurve {
                context: "uncompressed point decoding"
            }
        );

        // wrong prefix and wrong length
        let mut bad_prefix = bytes.clone();
        bad_prefix[0] = 0x05;
        assert!(curve.point_from_uncompressed(&bad_prefix).is_err());
        assert!(curve.point_from_uncompressed(&bytes[1..]).is_err());
    }

    #[test]
    fn compressed_roundtrip() {
        let curve = tiny_curve();
        let field_len = curve.params().field_byte_length();

        for point in [curve.generator(), curve.double(&curve.generator())] {
            let compressed = point.to_compressed_bytes(field_len);
            assert_eq!(curve.point_from_compressed(&compressed).unwrap(), point);
        }

        let id = Point::Identity.to_compressed_bytes(field_len);
        assert!(curve.point_from_compressed(&id).unwrap().is_identity());

        // x with no matching y on the curve
        let mut no_sqrt = vec![0x02];
        no_sqrt.extend_from_slice(&[5]);
        if curve.point_from_compressed(&no_sqrt).is_ok() {
            // x = 5 happens to be on-curve for some parameter tweaks; the
            // assertion that matters is consistency with membership
            let p = curve.point_from_compressed(&no_sqrt).unwrap();
            assert!(curve.is_on_curve(&p));
        }
    }

    #[test]
    fn compressed_zero_y_parity() {
        let curve = tiny_curve();
        // (30, 0) is on the curve; only the even-parity tag can name it
        let even = curve.point_from_compressed(&[0x02, 30]).unwrap();
        assert_eq!(even, affine(30, 0));
        assert!(curve.point_from_compressed(&[0x03, 30]).is_err());
    }

    #[test]
    fn external_point_validation() {
        let curve = tiny_curve();
        assert!(curve
            .validate_external_point(&curve.generator(), "test")
            .is_ok());
        assert_eq!(
            curve.validate_external_point(&affine(3, 7), "test"),
            Err(Error::PointNotOnCurve { context: "test" })
        );
        assert_eq!(
            curve.validate_external_point(&Point::Identity, "test"),
            Err(Error::PointAtInfinity { context: "test" })
        );
    }
}
