//! Numeric and dimensional bounds
//!
//! Every value the engine stores or produces must fall inside these bounds.
//! They are compile-time constants rather than platform intrinsics so the
//! safe ranges do not shift with the host's integer or float model.

use dashu_int::IBig;

/// Largest row or column count a matrix may have
pub const SAFE_MATRIX_SIZE: usize = 5000;

/// Largest magnitude a `SafeInteger` may hold (2^53 - 1)
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Largest magnitude a `BigInteger` may hold (2^64 - 1)
pub const MAX_SAFE_BIG: u64 = u64::MAX;

/// Smallest magnitude a `SafeFloat` may hold.
///
/// Subnormal results have already lost precision, so they are rejected.
pub const MIN_SAFE_FLOAT_MAGNITUDE: f64 = f64::MIN_POSITIVE;

/// Above this size determinant and cofactor log a factorial-cost warning
pub const DETERMINANT_WARN_SIZE: usize = 10;

/// Check that a row or column count is usable
pub fn is_safe_matrix_length(n: usize) -> bool {
    n > 0 && n <= SAFE_MATRIX_SIZE
}

/// Check that an integer lies within ±MAX_SAFE_INTEGER
pub fn is_safe_integer(n: i64) -> bool {
    (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&n)
}

/// Check that a big integer lies within ±MAX_SAFE_BIG
pub fn is_safe_big(n: &IBig) -> bool {
    let bound = IBig::from(MAX_SAFE_BIG);
    *n <= bound && *n >= -bound
}

/// Check that a float is a finite, non-integral value of usable magnitude
pub fn is_safe_float(x: f64) -> bool {
    x.is_finite()
        && x.fract() != 0.0
        && x.abs() >= MIN_SAFE_FLOAT_MAGNITUDE
        && x.abs() < f64::MAX
}
