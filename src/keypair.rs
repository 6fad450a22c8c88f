//! Key pair generation
//!
//! A private key is a uniformly random scalar in `[1, n-1]`; the public key
//! is `Q = d·G`. The engine creates key pairs and hands them to the caller;
//! it does not own key storage or lifecycle beyond zeroizing what it can on
//! drop.

use crate::curve::Curve;
use crate::error::{validate, Error, Result};
use crate::field;
use crate::point::Point;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

/// Rejection-sampling attempts before the random source is declared broken.
/// Each draw keeps only `bits(n)` bits of entropy, so a candidate lands in
/// range with probability above 1/2 on every curve.
const MAX_SAMPLING_ATTEMPTS: usize = 128;

/// A private scalar and its derived public point
#[derive(Clone, Debug)]
pub struct KeyPair {
    private_scalar: BigUint,
    public_point: Point,
}

impl Zeroize for KeyPair {
    fn zeroize(&mut self) {
        // BigUint offers no in-place scrub of its limb allocation; dropping
        // the value after overwriting with zero is the best available short
        // of a fixed-width secret type.
        self.private_scalar.set_zero();
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl KeyPair {
    /// Generate a key pair from a cryptographically secure random source.
    ///
    /// Draws scalar-width random bytes, discards the bits above the width of
    /// `n`, and resamples while the candidate is zero or not below `n`. Fails
    /// with
    /// [`Error::InsufficientRandomness`] if the source itself fails or keeps
    /// producing out-of-range candidates.
    pub fn generate<R: CryptoRng + RngCore>(curve: &Curve, rng: &mut R) -> Result<Self> {
        let d = random_scalar(curve, rng, "keypair generation")?;
        let public_point = curve.multiply_base(&d);
        Ok(KeyPair {
            private_scalar: d,
            public_point,
        })
    }

    /// Rebuild a key pair from an existing private scalar.
    ///
    /// The scalar must lie in `[1, n-1]`; the public point is recomputed, so
    /// the pair invariant `Q = d·G` holds by construction.
    pub fn from_private_scalar(curve: &Curve, private_scalar: BigUint) -> Result<Self> {
        validate::scalar_range("private key import", &private_scalar, curve.params().n())?;
        let public_point = curve.multiply_base(&private_scalar);
        Ok(KeyPair {
            private_scalar,
            public_point,
        })
    }

    /// The private scalar `d`
    pub fn private_scalar(&self) -> &BigUint {
        &self.private_scalar
    }

    /// Fixed-width big-endian encoding of the private scalar, zeroized on
    /// drop
    pub fn private_bytes(&self, curve: &Curve) -> Zeroizing<Vec<u8>> {
        field::to_fixed_bytes(&self.private_scalar, curve.params().scalar_byte_length())
    }

    /// The public point `Q = d·G`
    pub fn public_point(&self) -> &Point {
        &self.public_point
    }
}

/// Draw a uniformly random scalar in `[1, n-1]` by rejection sampling.
pub(crate) fn random_scalar<R: CryptoRng + RngCore>(
    curve: &Curve,
    rng: &mut R,
    context: &'static str,
) -> Result<BigUint> {
    let len = curve.params().scalar_byte_length();
    let n = curve.params().n();
    let excess_bits = (len as u64) * 8 - n.bits();
    let mut buf = Zeroizing::new(vec![0u8; len]);

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        rng.try_fill_bytes(&mut buf)
            .map_err(|_| Error::InsufficientRandomness { context })?;
        let candidate = BigUint::from_bytes_be(&buf) >> excess_bits;
        if !candidate.is_zero() && &candidate < n {
            return Ok(candidate);
        }
    }
    Err(Error::InsufficientRandomness { context })
}
