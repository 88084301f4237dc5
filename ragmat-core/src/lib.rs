//! Ragmat Core - Fundamental types
//!
//! This crate provides the core types used throughout ragmat:
//! - `NumericValue`: Safe integers, safe floats and bounded big integers
//! - `combine`: The safe-arithmetic choke point every operation routes through
//! - `MatrixError`: Structured errors with machine-readable codes
//! - `limits`: Matrix size and numeric range constants

mod number;
mod arith;
mod error;
pub mod limits;

pub use number::{NumericValue, BigInteger, ValueKind};
pub use arith::{combine, combine_values, Op, ParseOpError};
pub use error::{MatrixError, Result, codes};
pub use limits::{SAFE_MATRIX_SIZE, MAX_SAFE_INTEGER, MAX_SAFE_BIG};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{NumericValue, BigInteger, Op, MatrixError, Result};
    pub use crate::{combine, combine_values};
}
