//! Error handling for the elliptic curve engine

use std::fmt;

/// The error type for elliptic curve operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A scalar (private key, nonce, or signature component) falls outside
    /// the valid range `[1, n-1]`
    InvalidScalarRange {
        /// Operation that received the out-of-range scalar
        context: &'static str,
    },

    /// A supplied point does not satisfy the curve equation
    PointNotOnCurve {
        /// Operation that received the invalid point
        context: &'static str,
    },

    /// A point is the identity element where a proper affine point was
    /// required
    PointAtInfinity {
        /// Operation that encountered the identity
        context: &'static str,
    },

    /// The random source failed to produce usable entropy
    InsufficientRandomness {
        /// Operation that was drawing randomness
        context: &'static str,
    },

    /// No modular inverse exists for the operand; unreachable for a prime
    /// modulus and a non-zero operand, so this indicates broken parameters
    NoInverse {
        /// Operation that required the inverse
        operation: &'static str,
    },

    /// Parameter validation error
    Parameter {
        /// Name of the invalid parameter
        name: &'static str,
        /// Reason why the parameter is invalid
        reason: &'static str,
    },

    /// Length validation error
    Length {
        /// Context where the length error occurred
        context: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },
}

impl Error {
    /// Shorthand to create a Parameter error
    pub fn param(name: &'static str, reason: &'static str) -> Self {
        Error::Parameter { name, reason }
    }
}

/// Result type for elliptic curve operations
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidScalarRange { context } => {
                write!(f, "Scalar out of range [1, n-1] in {}", context)
            }
            Error::PointNotOnCurve { context } => {
                write!(f, "Point does not satisfy curve equation in {}", context)
            }
            Error::PointAtInfinity { context } => {
                write!(f, "Unexpected point at infinity in {}", context)
            }
            Error::InsufficientRandomness { context } => {
                write!(f, "Random source failed in {}", context)
            }
            Error::NoInverse { operation } => {
                write!(f, "No modular inverse exists in {}", operation)
            }
            Error::Parameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            Error::Length {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Invalid length for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for Error {}

// Include the validation submodule
pub mod validate;
