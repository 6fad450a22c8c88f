//! Affine point representation
//!
//! The identity element is a distinct variant rather than a sentinel
//! coordinate pair: `(0, 0)` happens to be off-curve whenever `b ≠ 0`, but a
//! tagged representation holds on every curve this engine accepts.

use num_bigint::BigUint;

use crate::field;

/// A point on a short-Weierstrass curve
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Point {
    /// The point at infinity (group identity)
    Identity,
    /// An affine coordinate pair satisfying the curve equation
    Affine {
        /// x-coordinate, reduced mod p
        x: BigUint,
        /// y-coordinate, reduced mod p
        y: BigUint,
    },
}

impl Point {
    /// Check whether this point is the identity element
    pub fn is_identity(&self) -> bool {
        matches!(self, Point::Identity)
    }

    /// The x-coordinate, or `None` for the identity
    pub fn x(&self) -> Option<&BigUint> {
        match self {
            Point::Identity => None,
            Point::Affine { x, .. } => Some(x),
        }
    }

    /// The y-coordinate, or `None` for the identity
    pub fn y(&self) -> Option<&BigUint> {
        match self {
            Point::Identity => None,
            Point::Affine { y, .. } => Some(y),
        }
    }

    /// Serialize in uncompressed form: `0x04 || x || y` with each coordinate
    /// left-padded to `field_len` bytes. The identity serializes as an
    /// all-zero buffer.
    pub fn to_uncompressed_bytes(&self, field_len: usize) -> Vec<u8> {
        match self {
            Point::Identity => vec![0u8; 1 + 2 * field_len],
            Point::Affine { x, y } => {
                let mut out = Vec::with_capacity(1 + 2 * field_len);
                out.push(0x04);
                out.extend_from_slice(&field::to_fixed_bytes(x, field_len));
                out.extend_from_slice(&field::to_fixed_bytes(y, field_len));
                out
            }
        }
    }

    /// Serialize in compressed form: `0x02/0x03 || x`, the prefix carrying
    /// the parity of `y`. The identity serializes as an all-zero buffer.
    pub fn to_compressed_bytes(&self, field_len: usize) -> Vec<u8> {
        match self {
            Point::Identity => vec![0u8; 1 + field_len],
            Point::Affine { x, y } => {
                let mut out = Vec::with_capacity(1 + field_len);
                out.push(if y.bit(0) { 0x03 } else { 0x02 });
                out.extend_from_slice(&field::to_fixed_bytes(x, field_len));
                out
            }
        }
    }
}
