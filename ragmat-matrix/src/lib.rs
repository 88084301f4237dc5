//! Ragmat Matrix - Sparse matrices and linear algebra
//!
//! Provides a coordinate-addressed matrix store and the operations over it:
//! - Construction (rectangular and ragged shapes, identity, nested rows)
//! - Cell access (get, set, delete) with range and value checks
//! - Structural operations (transpose, scalar transforms, equality, find, min/max, mean)
//! - Properties (determinant, cofactor, adjugate)
//! - Products and solving (multiply, inverse, pseudoinverse, divide)
//!
//! All arithmetic goes through `ragmat_core::combine`, so integer and
//! big-integer matrices stay exact and any precision loss is an error.

mod types;
mod helpers;
mod ops;
mod props;
mod product;
mod solve;

pub use types::{Coord, ColSpec, Shape, SparseMatrix};
pub use ops::{Axis, Extremum};
pub use solve::inverse_from_parts;
