//! Determinant, cofactor and adjugate by Laplace expansion
//!
//! Minors are never materialized: a minor is a pair of row and column index
//! lists into the parent matrix. Every product and sum goes through the safe
//! arithmetic layer, so integer and big-integer inputs give exact results.

use ragmat_core::{combine, combine_values, MatrixError, NumericValue, Op, Result};
use tracing::trace;
use crate::helpers::{check_square, sign, warn_if_expensive, without};
use crate::types::{Coord, Shape, SparseMatrix};

impl SparseMatrix {
    /// Determinant by cofactor expansion along the first row
    pub fn determinant(&self) -> Result<NumericValue> {
        let n = check_square(self, "determinant")?;
        warn_if_expensive(n, "determinant");
        let all: Vec<usize> = (0..n).collect();
        let det = minor_determinant(self, &all, &all)?;
        trace!(n, %det, "determinant");
        Ok(det)
    }

    /// Matrix of signed minors
    pub fn cofactor(&self) -> Result<SparseMatrix> {
        let n = check_square(self, "cofactor")?;
        warn_if_expensive(n, "cofactor");
        let all: Vec<usize> = (0..n).collect();

        let mut result = SparseMatrix::with_shape(Shape::Uniform { rows: n, cols: n });
        for i in 0..n {
            let rows = without(&all, i);
            for j in 0..n {
                let minor = minor_determinant(self, &rows, &without(&all, j))?;
                result.put(Coord::new(i, j), combine_values(&sign(i + j), &minor, Op::Multiply)?);
            }
        }
        Ok(result)
    }

    /// Transpose of the cofactor matrix
    pub fn adjugate(&self) -> Result<SparseMatrix> {
        Ok(self.cofactor()?.transpose())
    }
}

/// Determinant of the submatrix selected by `rows` × `cols`.
///
/// The empty minor has determinant 1, which makes the cofactor of a 1×1
/// matrix `[[1]]`.
fn minor_determinant(m: &SparseMatrix, rows: &[usize], cols: &[usize]) -> Result<NumericValue> {
    match rows.len() {
        0 => Ok(NumericValue::from(1)),
        1 => m.value_at(rows[0], cols[0])
            .cloned()
            .ok_or_else(|| MatrixError::null_operand("determinant")),
        2 => {
            let cell = |r: usize, c: usize| m.value_at(rows[r], cols[c]);
            let ad = combine(cell(0, 0), cell(1, 1), Op::Multiply)?;
            let bc = combine(cell(0, 1), cell(1, 0), Op::Multiply)?;
            combine_values(&ad, &bc, Op::Subtract)
        }
        _ => {
            let sub_rows = &rows[1..];
            let mut det = NumericValue::from(0);
            for (j, &col) in cols.iter().enumerate() {
                let signed = combine(Some(&sign(j)), m.value_at(rows[0], col), Op::Multiply)?;
                let minor = minor_determinant(m, sub_rows, &without(cols, j))?;
                let term = combine_values(&signed, &minor, Op::Multiply)?;
                det = combine_values(&det, &term, Op::Add)?;
            }
            Ok(det)
        }
    }
}
