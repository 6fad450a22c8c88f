//! Modular arithmetic over a runtime prime modulus
//!
//! Field elements are plain [`BigUint`] values; every operation here returns
//! a result reduced into `[0, p)`. The modulus travels with the
//! [`CurveParams`](crate::CurveParams) value rather than being baked into a
//! wrapper type, since the engine accepts curve parameters at run time.

use crate::error::{Error, Result};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use zeroize::Zeroizing;

/// Modular addition: `(a + b) mod p`
pub fn add(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a + b) % p
}

/// Modular subtraction: `(a - b) mod p`, wrapping into `[0, p)`
pub fn sub(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    let a = a % p;
    let b = b % p;
    if a >= b {
        a - b
    } else {
        p - b + a
    }
}

/// Modular multiplication: `(a * b) mod p`
pub fn mul(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

/// Modular exponentiation: `base^exp mod p`
pub fn pow(base: &BigUint, exp: &BigUint, p: &BigUint) -> BigUint {
    base.modpow(exp, p)
}

/// Modular inverse via the extended Euclidean algorithm.
///
/// Returns `a⁻¹ mod p`. Fails with [`Error::NoInverse`] only if
/// `a ≡ 0 (mod p)` or `gcd(a, p) ≠ 1`; neither is reachable for a prime
/// modulus and a non-zero operand, so callers treat the error as a sign of
/// broken parameters rather than a runtime condition to recover from.
pub fn inverse(a: &BigUint, p: &BigUint) -> Result<BigUint> {
    let operation = "modular inverse";
    let a = a % p;
    if a.is_zero() {
        return Err(Error::NoInverse { operation });
    }

    let modulus = BigInt::from(p.clone());
    let mut r0 = modulus.clone();
    let mut r1 = BigInt::from(a);
    let mut t0 = BigInt::zero();
    let mut t1 = BigInt::one();

    while !r1.is_zero() {
        let q = &r0 / &r1;
        let r2 = &r0 - &q * &r1;
        let t2 = &t0 - &q * &t1;
        (r0, r1) = (r1, r2);
        (t0, t1) = (t1, t2);
    }

    if !r0.is_one() {
        // gcd(a, p) > 1 can only happen with a composite modulus
        return Err(Error::NoInverse { operation });
    }

    let inv = t0.mod_floor(&modulus);
    Ok(inv
        .to_biguint()
        .expect("mod_floor with a positive modulus is non-negative"))
}

/// Modular square root, if one exists.
///
/// Uses the `a^((p+1)/4)` shortcut for `p ≡ 3 (mod 4)` (which covers the
/// secp256k1-style curves in use here) and Tonelli-Shanks otherwise.
/// Returns `None` when `a` is a quadratic non-residue.
pub fn sqrt(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let a = a % p;
    if a.is_zero() {
        return Some(BigUint::zero());
    }

    let one = BigUint::one();
    let legendre_exp = (p - &one) >> 1;
    if a.modpow(&legendre_exp, p) != one {
        return None;
    }

    if p % BigUint::from(4u32) == BigUint::from(3u32) {
        let exp = (p + &one) >> 2;
        return Some(a.modpow(&exp, p));
    }

    // Tonelli-Shanks: write p - 1 = q * 2^s with q odd
    let mut q = p - &one;
    let mut s = 0usize;
    while q.is_even() {
        q >>= 1;
        s += 1;
    }

    // Smallest quadratic non-residue serves as the generator of the
    // 2-Sylow subgroup
    let mut z = BigUint::from(2u32);
    while z.modpow(&legendre_exp, p) == one {
        z += &one;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.modpow(&q, p);
    let mut r = a.modpow(&((&q + &one) >> 1), p);

    while t != one {
        let mut i = 0usize;
        let mut t2 = t.clone();
        while t2 != one {
            t2 = (&t2 * &t2) % p;
            i += 1;
        }

        let b = c.modpow(&(BigUint::one() << (m - i - 1)), p);
        m = i;
        c = (&b * &b) % p;
        t = (&t * &c) % p;
        r = (&r * &b) % p;
    }

    Some(r)
}

/// Big-endian encoding left-padded to `len` bytes.
///
/// The value must fit in `len` bytes; encodings of secrets go through the
/// same path, so the buffer is handed back zeroizing.
pub fn to_fixed_bytes(value: &BigUint, len: usize) -> Zeroizing<Vec<u8>> {
    let raw = value.to_bytes_be();
    debug_assert!(raw.len() <= len, "value does not fit in {} bytes", len);
    let mut out = Zeroizing::new(vec![0u8; len]);
    let offset = len - raw.len();
    out[offset..].copy_from_slice(&raw);
    out
}
