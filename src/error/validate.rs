//! Validation utilities shared across the engine

use super::{Error, Result};
use num_bigint::BigUint;
use num_traits::Zero;

/// Validate a parameter condition
#[inline(always)]
pub fn parameter(condition: bool, name: &'static str, reason: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::param(name, reason));
    }
    Ok(())
}

/// Validate a length
#[inline(always)]
pub fn length(context: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::Length {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validate that a scalar lies in `[1, n-1]`
#[inline]
pub fn scalar_range(context: &'static str, scalar: &BigUint, n: &BigUint) -> Result<()> {
    if scalar.is_zero() || scalar >= n {
        return Err(Error::InvalidScalarRange { context });
    }
    Ok(())
}
