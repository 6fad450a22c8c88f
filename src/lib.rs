//! Parametrized elliptic curve engine over prime fields
//!
//! This crate consolidates the curve arithmetic that tends to get
//! reimplemented, with varying correctness, inside application code: modular
//! field arithmetic, the short-Weierstrass group law
//! (`y² = x³ + ax + b mod p`), double-and-add scalar multiplication, and the
//! protocols built directly on top — key-pair generation, ECDSA-style
//! signatures and ECDH-style shared-secret derivation.
//!
//! Curve selection is always an explicit [`CurveParams`] value bound into a
//! [`Curve`] handle; there is no global or default curve. Hash functions and
//! randomness are external collaborators: digests arrive as opaque byte
//! strings, and every generating operation takes a caller-supplied
//! `CryptoRng + RngCore` source.
//!
//! All operations are pure, synchronous and CPU-bound over immutable value
//! types; a [`Curve`] (including its precomputed generator table) is safe to
//! share across threads.
//!
//! # Example
//!
//! ```
//! use ecprime::{ecdh, ecdsa, Curve, KeyPair};
//! use rand::rngs::OsRng;
//! use sha2::{Digest, Sha256};
//!
//! let curve = Curve::secp256k1();
//! let pair = KeyPair::generate(&curve, &mut OsRng)?;
//!
//! let digest = Sha256::digest(b"message");
//! let sig = ecdsa::sign_hedged(&curve, pair.private_scalar(), &digest, &mut OsRng)?;
//! assert!(ecdsa::verify(&curve, pair.public_point(), &digest, &sig));
//!
//! let peer = KeyPair::generate(&curve, &mut OsRng)?;
//! let secret = ecdh::derive_shared_secret(&curve, pair.private_scalar(), peer.public_point())?;
//! # let _ = secret;
//! # Ok::<(), ecprime::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

// Error module and re-exports
pub mod error;
pub use error::{Error, Result};

// Field arithmetic over a runtime prime modulus
pub mod field;

// Curve description and group operations
pub mod curve;
pub mod params;
pub mod point;
pub use curve::Curve;
pub use params::CurveParams;
pub use point::Point;

// Key generation and the protocols on top of scalar multiplication
pub mod ecdh;
pub mod ecdsa;
pub mod keypair;
pub use ecdsa::Signature;
pub use keypair::KeyPair;
