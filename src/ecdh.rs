//! ECDH-style shared-secret derivation
//!
//! The remote public point is validated before any arithmetic touches it —
//! this is the most security-critical check in the engine, since an
//! unvalidated "public key" opens small-subgroup and invalid-curve attacks.
//! The output is the raw x-coordinate of `d·Q`; callers are expected to run
//! it through a key-derivation function before using it as a symmetric key.

use crate::curve::Curve;
use crate::error::{validate, Error, Result};
use crate::field;
use crate::point::Point;
use num_bigint::BigUint;
use zeroize::Zeroizing;

/// Derive the shared secret `(d·Q).x` as big-endian bytes padded to the
/// field byte length.
///
/// Rejects a private scalar outside `[1, n-1]`, an off-curve or identity
/// remote point, and (for cofactor > 1 inputs outside the prime-order
/// subgroup) an identity result.
pub fn derive_shared_secret(
    curve: &Curve,
    private_scalar: &BigUint,
    remote_public_point: &Point,
) -> Result<Zeroizing<Vec<u8>>> {
    validate::scalar_range("shared secret derivation", private_scalar, curve.params().n())?;
    curve.validate_external_point(remote_public_point, "shared secret derivation")?;

    let shared_point = curve.multiply(private_scalar, remote_public_point);
    match shared_point.x() {
        Some(x) => Ok(field::to_fixed_bytes(x, curve.params().field_byte_length())),
        None => Err(Error::PointAtInfinity {
            context: "shared secret derivation",
        }),
    }
}
