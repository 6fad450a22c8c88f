//! ECDSA-style signing and verification
//!
//! The digest is an opaque byte string produced by an external hash; it is
//! reinterpreted as a big-endian integer and reduced mod `n` before use.
//!
//! Two signing paths are provided. [`sign`] draws a fresh random nonce per
//! call. [`sign_hedged`] derives the nonce from the private key and digest
//! via HMAC-SHA256 (RFC 6979 construction) mixed with 32 bytes of RNG
//! entropy, so a stuck random source can no longer repeat a nonce — reuse of
//! a nonce across two signatures leaks the private key algebraically.
//!
//! [`verify`] returns a plain `bool` and never fails: a malformed signature,
//! an off-curve public point or an out-of-range component all verify as
//! `false`, so verification cannot become an error-based oracle for the
//! failure cause.

use crate::curve::Curve;
use crate::error::{validate, Error, Result};
use crate::field;
use crate::point::Point;
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

type HmacSha256 = Hmac<Sha256>;

/// An ECDSA signature: the pair `(r, s)`, both in `[1, n-1]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Assemble a signature from its components
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Signature { r, s }
    }

    /// The `r` component
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// The `s` component
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Fixed-width encoding `r || s`, each component big-endian and padded
    /// to the curve's scalar byte length
    pub fn to_bytes(&self, curve: &Curve) -> Vec<u8> {
        let len = curve.params().scalar_byte_length();
        let mut out = Vec::with_capacity(2 * len);
        out.extend_from_slice(&field::to_fixed_bytes(&self.r, len));
        out.extend_from_slice(&field::to_fixed_bytes(&self.s, len));
        out
    }

    /// Decode a fixed-width `r || s` signature.
    ///
    /// Only the length is checked here; range validation happens inside
    /// [`verify`], which treats out-of-range components as a failed
    /// verification rather than an error.
    pub fn from_bytes(curve: &Curve, bytes: &[u8]) -> Result<Self> {
        let len = curve.params().scalar_byte_length();
        validate::length("signature", bytes.len(), 2 * len)?;
        Ok(Signature {
            r: BigUint::from_bytes_be(&bytes[..len]),
            s: BigUint::from_bytes_be(&bytes[len..]),
        })
    }
}

/// Sign a digest with a fresh random nonce.
///
/// Loop per the signature equation: draw `k ∈ [1, n-1]`, compute
/// `r = (k·G).x mod n` (retry on zero), then `s = k⁻¹(z + r·d) mod n`
/// (retry on zero). The nonce must never repeat across signatures under the
/// same key; prefer [`sign_hedged`] where the quality of `rng` is not fully
/// trusted.
pub fn sign<R: CryptoRng + RngCore>(
    curve: &Curve,
    private_scalar: &BigUint,
    digest: &[u8],
    rng: &mut R,
) -> Result<Signature> {
    let n = curve.params().n();
    validate::scalar_range("sign", private_scalar, n)?;
    let z = BigUint::from_bytes_be(digest) % n;

    loop {
        let mut k = crate::keypair::random_scalar(curve, rng, "sign")?;
        let sig = sign_with_nonce(curve, private_scalar, &z, &k);
        k.set_zero();
        if let Some(sig) = sig {
            return Ok(sig);
        }
    }
}

/// Sign a digest with a hedged deterministic nonce.
///
/// The nonce comes from the RFC 6979 HMAC-SHA256 derivation over the private
/// key and digest, with 32 bytes of extra RNG entropy folded into the seed
/// material. A broken RNG degrades this to plain RFC 6979 determinism
/// instead of nonce reuse.
pub fn sign_hedged<R: CryptoRng + RngCore>(
    curve: &Curve,
    private_scalar: &BigUint,
    digest: &[u8],
    rng: &mut R,
) -> Result<Signature> {
    let n = curve.params().n();
    validate::scalar_range("sign", private_scalar, n)?;
    let z = BigUint::from_bytes_be(digest) % n;

    let mut nonce = HedgedNonce::new(curve, private_scalar, &z, rng)?;
    loop {
        let mut k = nonce.next_candidate();
        let sig = sign_with_nonce(curve, private_scalar, &z, &k);
        k.set_zero();
        if let Some(sig) = sig {
            return Ok(sig);
        }
    }
}

/// One pass of the signature equation. `None` means the nonce produced a
/// zero `r` or `s` and the caller must retry with a fresh one.
fn sign_with_nonce(
    curve: &Curve,
    private_scalar: &BigUint,
    z: &BigUint,
    k: &BigUint,
) -> Option<Signature> {
    let n = curve.params().n();

    let kg = curve.multiply_base(k);
    let r = match kg.x() {
        Some(x) => x % n,
        None => return None,
    };
    if r.is_zero() {
        return None;
    }

    // k is non-zero and below n, so the inverse exists
    let k_inv = field::inverse(k, n).ok()?;
    let rd = field::mul(&r, private_scalar, n);
    let s = field::mul(&k_inv, &field::add(z, &rd, n), n);
    if s.is_zero() {
        return None;
    }
    Some(Signature { r, s })
}

/// Verify a signature over a digest.
///
/// Preconditions checked before any arithmetic: the public point is on-curve
/// and not the identity, and `r, s ∈ [1, n-1]`. Any violation returns
/// `false`. The final comparison of `r` against the recovered x-coordinate
/// is constant-time.
pub fn verify(curve: &Curve, public_point: &Point, digest: &[u8], signature: &Signature) -> bool {
    let n = curve.params().n();

    if curve.validate_external_point(public_point, "verify").is_err() {
        return false;
    }
    if signature.r.is_zero() || &signature.r >= n {
        return false;
    }
    if signature.s.is_zero() || &signature.s >= n {
        return false;
    }

    let z = BigUint::from_bytes_be(digest) % n;

    let w = match field::inverse(&signature.s, n) {
        Ok(w) => w,
        Err(_) => return false,
    };
    let u1 = field::mul(&z, &w, n);
    let u2 = field::mul(&signature.r, &w, n);

    let point = curve.add(
        &curve.multiply_base(&u1),
        &curve.multiply(&u2, public_point),
    );
    let x = match point.x() {
        Some(x) => x % n,
        None => return false,
    };

    let len = curve.params().scalar_byte_length();
    let x_bytes = field::to_fixed_bytes(&x, len);
    let r_bytes = field::to_fixed_bytes(&signature.r, len);
    x_bytes.ct_eq(&r_bytes).into()
}

/// RFC 6979 §3.2 nonce state, hedged with extra entropy per §3.6.
///
/// Candidate material is drawn HMAC-block-wise until the scalar width is
/// covered, then truncated to the bit length of `n` (bits2int); candidates
/// outside `[1, n-1]` step the state and retry.
struct HedgedNonce<'c> {
    curve: &'c Curve,
    v: [u8; 32],
    k: [u8; 32],
}

impl<'c> HedgedNonce<'c> {
    fn new<R: CryptoRng + RngCore>(
        curve: &'c Curve,
        private_scalar: &BigUint,
        z: &BigUint,
        rng: &mut R,
    ) -> Result<Self> {
        let qlen = curve.params().scalar_byte_length();
        let d_bytes = field::to_fixed_bytes(private_scalar, qlen);
        let z_bytes = field::to_fixed_bytes(z, qlen);

        let mut rbuf = [0u8; 32];
        rng.try_fill_bytes(&mut rbuf)
            .map_err(|_| Error::InsufficientRandomness { context: "sign" })?;

        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];

        // steps C-F: two absorb rounds over d, z and the entropy hedge
        for tag in [0x00u8, 0x01u8] {
            let mut mac = hmac(&k);
            mac.update(&v);
            mac.update(&[tag]);
            mac.update(&d_bytes);
            mac.update(&z_bytes);
            mac.update(&rbuf);
            k.copy_from_slice(&mac.finalize().into_bytes());

            let mut mac = hmac(&k);
            mac.update(&v);
            v.copy_from_slice(&mac.finalize().into_bytes());
        }

        rbuf.zeroize();
        Ok(HedgedNonce { curve, v, k })
    }

    fn next_candidate(&mut self) -> BigUint {
        let params = self.curve.params();
        let qlen = params.scalar_byte_length();
        let n = params.n();
        let excess_bits = (qlen as u64) * 8 - n.bits();

        loop {
            // step G: stretch V blocks to the scalar width
            let mut t = Zeroizing::new(Vec::with_capacity(qlen));
            while t.len() < qlen {
                let mut mac = hmac(&self.k);
                mac.update(&self.v);
                self.v.copy_from_slice(&mac.finalize().into_bytes());
                t.extend_from_slice(&self.v);
            }
            t.truncate(qlen);

            let candidate = BigUint::from_bytes_be(&t) >> excess_bits;
            if !candidate.is_zero() && &candidate < n {
                return candidate;
            }

            // step H: invalid candidate, step the state
            let mut mac = hmac(&self.k);
            mac.update(&self.v);
            mac.update(&[0x00]);
            self.k.copy_from_slice(&mac.finalize().into_bytes());

            let mut mac = hmac(&self.k);
            mac.update(&self.v);
            self.v.copy_from_slice(&mac.finalize().into_bytes());
        }
    }
}

impl Drop for HedgedNonce<'_> {
    fn drop(&mut self) {
        self.v.zeroize();
        self.k.zeroize();
    }
}

fn hmac(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts any key length")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::KeyPair;
    use rand::rngs::OsRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use sha2::{Digest, Sha256};

    fn digest(message: &[u8]) -> [u8; 32] {
        Sha256::digest(message).into()
    }

    #[test]
    fn sign_verify_roundtrip() {
        let curve = Curve::secp256k1();
        let pair = KeyPair::generate(&curve, &mut OsRng).unwrap();
        let d = digest(b"arbitrary message");

        let sig = sign(&curve, pair.private_scalar(), &d, &mut OsRng).unwrap();
        assert!(verify(&curve, pair.public_point(), &d, &sig));

        // different digest must not verify
        assert!(!verify(&curve, pair.public_point(), &digest(b"other"), &sig));
    }

    #[test]
    fn hedged_roundtrip() {
        let curve = Curve::secp256k1();
        let pair = KeyPair::generate(&curve, &mut OsRng).unwrap();
        let d = digest(b"hedged message");

        let sig = sign_hedged(&curve, pair.private_scalar(), &d, &mut OsRng).unwrap();
        assert!(verify(&curve, pair.public_point(), &d, &sig));
    }

    #[test]
    fn hedged_nonces_differ_across_entropy() {
        // same key and digest, different hedge entropy: the signatures must
        // differ (equality would mean the hedge is ignored)
        let curve = Curve::secp256k1();
        let pair = KeyPair::generate(&curve, &mut OsRng).unwrap();
        let d = digest(b"entropy check");

        let a = sign_hedged(
            &curve,
            pair.private_scalar(),
            &d,
            &mut ChaCha20Rng::seed_from_u64(1),
        )
        .unwrap();
        let b = sign_hedged(
            &curve,
            pair.private_scalar(),
            &d,
            &mut ChaCha20Rng::seed_from_u64(2),
        )
        .unwrap();
        assert_ne!(a, b);
        assert!(verify(&curve, pair.public_point(), &d, &a));
        assert!(verify(&curve, pair.public_point(), &d, &b));
    }

    #[test]
    fn verify_rejects_out_of_range_components() {
        let curve = Curve::secp256k1();
        let pair = KeyPair::generate(&curve, &mut OsRng).unwrap();
        let d = digest(b"range");
        let sig = sign(&curve, pair.private_scalar(), &d, &mut OsRng).unwrap();
        let n = curve.params().n().clone();

        for bad in [
            Signature::new(BigUint::zero(), sig.s().clone()),
            Signature::new(sig.r().clone(), BigUint::zero()),
            Signature::new(n.clone(), sig.s().clone()),
            Signature::new(sig.r().clone(), n.clone()),
            Signature::new(&n + 1u32, sig.s().clone()),
        ] {
            assert!(!verify(&curve, pair.public_point(), &d, &bad));
        }
    }

    #[test]
    fn verify_rejects_bad_public_points() {
        let curve = Curve::secp256k1();
        let pair = KeyPair::generate(&curve, &mut OsRng).unwrap();
        let d = digest(b"points");
        let sig = sign(&curve, pair.private_scalar(), &d, &mut OsRng).unwrap();

        assert!(!verify(&curve, &Point::Identity, &d, &sig));

        let off_curve = Point::Affine {
            x: BigUint::from(1u32),
            y: BigUint::from(1u32),
        };
        assert!(!verify(&curve, &off_curve, &d, &sig));

        // valid point, wrong key
        let other = KeyPair::generate(&curve, &mut OsRng).unwrap();
        assert!(!verify(&curve, other.public_point(), &d, &sig));
    }

    #[test]
    fn sign_rejects_out_of_range_private_key() {
        let curve = Curve::secp256k1();
        let d = digest(b"x");
        assert_eq!(
            sign(&curve, &BigUint::zero(), &d, &mut OsRng).unwrap_err(),
            Error::InvalidScalarRange { context: "sign" }
        );
        assert!(sign(&curve, curve.params().n(), &d, &mut OsRng).is_err());
    }

    #[test]
    fn signature_codec_roundtrip() {
        let curve = Curve::secp256k1();
        let pair = KeyPair::generate(&curve, &mut OsRng).unwrap();
        let d = digest(b"codec");
        let sig = sign(&curve, pair.private_scalar(), &d, &mut OsRng).unwrap();

        let bytes = sig.to_bytes(&curve);
        assert_eq!(bytes.len(), 64);
        assert_eq!(Signature::from_bytes(&curve, &bytes).unwrap(), sig);

        assert_eq!(
            Signature::from_bytes(&curve, &bytes[..63]).unwrap_err(),
            Error::Length {
                context: "signature",
                expected: 64,
                actual: 63,
            }
        );
    }

    #[test]
    fn empty_digest_is_signable() {
        // z = 0 is legal in the signature equation; s = k⁻¹·r·d
        let curve = Curve::secp256k1();
        let pair = KeyPair::generate(&curve, &mut OsRng).unwrap();
        let sig = sign(&curve, pair.private_scalar(), &[], &mut OsRng).unwrap();
        assert!(verify(&curve, pair.public_point(), &[], &sig));
    }
}
