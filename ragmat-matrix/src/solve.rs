//! Inverse, Moore-Penrose pseudoinverse and matrix division

use ragmat_core::{combine, MatrixError, NumericValue, Op, Result};
use tracing::debug;
use crate::helpers::{check_square, rectangular_cols};
use crate::types::SparseMatrix;

impl SparseMatrix {
    /// Inverse as adjugate / determinant
    pub fn inverse(&self) -> Result<SparseMatrix> {
        check_square(self, "inverse")?;
        let det = self.determinant()?;
        if det.is_zero() {
            return Err(MatrixError::singular(&det));
        }
        inverse_from_parts(&self.adjugate()?, &det)
    }

    /// Moore-Penrose pseudoinverse of a full-rank rectangular matrix.
    ///
    /// Tall (and square) matrices use the left inverse (AᵀA)⁻¹Aᵀ, wide ones
    /// the right inverse Aᵀ(AAᵀ)⁻¹. A singular Gram matrix means the input
    /// is rank deficient.
    pub fn pseudoinverse(&self) -> Result<SparseMatrix> {
        let rows = self.rows();
        let cols = rectangular_cols(self, "pseudoinverse")?;
        let t = self.transpose();
        let rank_deficient = |e: MatrixError| match e {
            MatrixError::Singular { .. } => MatrixError::rank_deficient(rows, cols),
            other => other,
        };

        if rows >= cols {
            debug!(rows, cols, "pseudoinverse via left inverse");
            let gram = t.multiply(self)?;
            gram.inverse().map_err(rank_deficient)?.multiply(&t)
        } else {
            debug!(rows, cols, "pseudoinverse via right inverse");
            let gram = self.multiply(&t)?;
            t.multiply(&gram.inverse().map_err(rank_deficient)?)
        }
    }

    /// `self · other⁻¹`, using the pseudoinverse when `other` is not square
    pub fn divide(&self, other: &SparseMatrix) -> Result<SparseMatrix> {
        let divisor_cols = rectangular_cols(other, "divide")?;
        let inverse = if other.is_square() {
            if self.max_cols() != other.rows() {
                return Err(incompatible_divide(self, other, other.rows()));
            }
            debug!(left = %self.shape(), right = %other.shape(), "divide by inverse");
            let det = other.determinant()?;
            if det.is_zero() {
                return Err(MatrixError::singular(&det));
            }
            inverse_from_parts(&other.adjugate()?, &det)?
        } else {
            if self.max_cols() != divisor_cols {
                return Err(incompatible_divide(self, other, divisor_cols));
            }
            debug!(left = %self.shape(), right = %other.shape(), "divide by pseudoinverse");
            other.pseudoinverse()?
        };
        self.multiply(&inverse)
    }
}

/// Divide every cell of an adjugate by a determinant
pub fn inverse_from_parts(adjugate: &SparseMatrix, determinant: &NumericValue) -> Result<SparseMatrix> {
    if determinant.is_zero() || !determinant.is_safe() {
        return Err(MatrixError::singular(determinant));
    }

    let mut result = SparseMatrix::with_shape(adjugate.shape().clone());
    for (coord, value) in adjugate.iter() {
        result.put(coord, combine(value, Some(determinant), Op::Divide)?);
    }
    Ok(result)
}

fn incompatible_divide(m1: &SparseMatrix, m2: &SparseMatrix, expected: usize) -> MatrixError {
    MatrixError::incompatible(format!(
        "divide: {} by {} needs {} columns on the left, found {}",
        m1.shape(), m2.shape(), expected, m1.max_cols()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashu_int::IBig;
    use nalgebra::DMatrix;

    fn m(rows: &[&[i32]]) -> SparseMatrix {
        SparseMatrix::from_rows(
            rows.iter().map(|r| r.iter().map(|v| NumericValue::from(*v)).collect()).collect()
        ).unwrap()
    }

    fn float(x: f64) -> NumericValue {
        NumericValue::float(x).unwrap()
    }

    fn assert_matrix_close(actual: &SparseMatrix, expected: &[&[f64]], tol: f64) {
        assert_eq!(actual.rows(), expected.len());
        for (i, row) in expected.iter().enumerate() {
            for (j, want) in row.iter().enumerate() {
                let got = actual.get(i, j).unwrap().map(NumericValue::to_f64).unwrap_or(f64::NAN);
                assert!((got - want).abs() < tol, "({}, {}): expected {}, got {}", i, j, want, got);
            }
        }
    }

    fn assert_dmatrix_close(actual: &DMatrix<f64>, expected: &DMatrix<f64>, tol: f64) {
        assert_eq!(actual.shape(), expected.shape());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < tol, "expected {}, got {}", e, a);
        }
    }

    #[test]
    fn test_inverse() {
        let a = m(&[&[1, 2], &[3, 4]]);
        let inv = a.inverse().unwrap();
        assert_eq!(inv.get(0, 0).unwrap(), Some(&NumericValue::from(-2)));
        assert_eq!(inv.get(1, 0).unwrap(), Some(&float(1.5)));
        assert_eq!(inv.get(1, 1).unwrap(), Some(&float(-0.5)));
        assert_eq!(a.multiply(&inv).unwrap(), SparseMatrix::identity(2).unwrap());
    }

    #[test]
    fn test_inverse_of_1x1() {
        let inv = m(&[&[4]]).inverse().unwrap();
        assert_eq!(inv.get(0, 0).unwrap(), Some(&float(0.25)));
    }

    #[test]
    fn test_inverse_singular() {
        let err = m(&[&[1, 2], &[2, 4]]).inverse().unwrap_err();
        assert_eq!(err, MatrixError::singular(0));
        assert_eq!(SparseMatrix::new(2, 3).unwrap().inverse().unwrap_err().code(), "NON_SQUARE");
    }

    #[test]
    fn test_inverse_from_parts() {
        let adj = m(&[&[4, -2], &[-3, 1]]);
        let inv = inverse_from_parts(&adj, &NumericValue::from(-2)).unwrap();
        let expected = SparseMatrix::from_rows(vec![
            vec![NumericValue::from(-2), NumericValue::from(1)],
            vec![float(1.5), float(-0.5)],
        ]).unwrap();
        assert_eq!(inv, expected);

        let err = inverse_from_parts(&adj, &NumericValue::from(0)).unwrap_err();
        assert_eq!(err.code(), "SINGULAR_MATRIX");
    }

    #[test]
    fn test_pseudoinverse_wide() {
        let a = m(&[&[3, 2, 2], &[2, 3, -2]]);
        let pinv = a.pseudoinverse().unwrap();
        assert_eq!(pinv.rows(), 3);
        assert_eq!(pinv.cols(), Some(2));
        assert_matrix_close(&pinv, &[
            &[0.155_555_555_6, 0.044_444_444_4],
            &[0.044_444_444_4, 0.155_555_555_6],
            &[0.222_222_222_2, -0.222_222_222_2],
        ], 1e-9);

        let (ad, pd) = (a.to_dmatrix().unwrap(), pinv.to_dmatrix().unwrap());
        assert_dmatrix_close(&(&ad * &pd * &ad), &ad, 1e-9);
    }

    #[test]
    fn test_pseudoinverse_tall() {
        let a = m(&[&[1, 2], &[3, 4], &[5, 6]]);
        let pinv = a.pseudoinverse().unwrap();
        let oracle = a.to_dmatrix().unwrap().pseudo_inverse(1e-12).unwrap();
        assert_dmatrix_close(&pinv.to_dmatrix().unwrap(), &oracle, 1e-9);
    }

    #[test]
    fn test_pseudoinverse_rank_deficient() {
        let err = m(&[&[1, 2, 3], &[2, 4, 6]]).pseudoinverse().unwrap_err();
        assert_eq!(err, MatrixError::rank_deficient(2, 3));

        let ragged = SparseMatrix::new(2, vec![1, 2]).unwrap();
        assert_eq!(ragged.pseudoinverse().unwrap_err().code(), "INCOMPATIBLE_DIMENSIONS");
    }

    #[test]
    fn test_divide_square() {
        let a = m(&[&[3, 2], &[2, 3]]);
        let b = m(&[&[43, 43], &[55, 64]]);
        assert_matrix_close(&a.divide(&b).unwrap(), &[
            &[0.211_886_304_9, -0.111_111_111_1],
            &[-0.095_607_235_1, 0.111_111_111_1],
        ], 1e-9);
    }

    #[test]
    fn test_divide_tall_by_square() {
        let a = m(&[&[134, 32], &[4, 5], &[43, 78]]);
        let b = m(&[&[423, 4324], &[4, 3]]);
        assert_matrix_close(&a.divide(&b).unwrap(), &[
            &[-0.017_096_150_246_459_1, 35.307_917_888_563_05],
            &[0.000_499_157_671_429_462_8, 0.947_214_076_246_334_2],
            &[0.011_418_231_733_948_96, 9.542_521_994_134_896],
        ], 1e-9);
    }

    #[test]
    fn test_divide_by_non_square() {
        let a = m(&[&[134, 32, 43], &[4, 5, 89]]);
        let b = m(&[&[423, 4324, 63], &[4, 3, 897]]);
        let q = a.divide(&b).unwrap();
        assert_eq!(q.cols(), Some(2));

        let oracle = a.to_dmatrix().unwrap() * b.to_dmatrix().unwrap().pseudo_inverse(1e-12).unwrap();
        assert_dmatrix_close(&q.to_dmatrix().unwrap(), &oracle, 1e-9);
    }

    #[test]
    fn test_divide_by_self_is_identity() {
        let a = m(&[&[1, 2], &[3, 4]]);
        assert_eq!(a.divide(&a).unwrap(), SparseMatrix::identity(2).unwrap());
    }

    #[test]
    fn test_divide_with_big_cell() {
        let mut a = m(&[&[0, 0], &[2, 3]]);
        a.set(0, 0, float(0.43232)).unwrap();
        a.set(0, 1, NumericValue::big(IBig::from(258_349_000_334u64)).unwrap()).unwrap();
        let b = m(&[&[1, 32], &[42, 53]]);

        let q = a.divide(&b).unwrap();
        // Inverse cells are small floats, which round to 0 against the big cell
        assert_eq!(q.get(0, 0).unwrap(), Some(&NumericValue::big(IBig::ZERO).unwrap()));
        assert_eq!(q.get(0, 1).unwrap(), Some(&NumericValue::big(IBig::ZERO).unwrap()));
        assert_matrix_close(&q, &[&[0.0, 0.0], &[0.015_491_866_769_945_77, 0.047_250_193_648_334_62]], 1e-9);
    }

    #[test]
    fn test_divide_failures() {
        let a = m(&[&[1, 2, 3]]);
        let b = m(&[&[1, 2], &[3, 4]]);
        assert_eq!(a.divide(&b).unwrap_err().code(), "INCOMPATIBLE_DIMENSIONS");

        let singular = m(&[&[1, 2], &[2, 4]]);
        assert_eq!(b.divide(&singular).unwrap_err().code(), "SINGULAR_MATRIX");

        let ragged = SparseMatrix::new(2, vec![2, 1]).unwrap();
        assert_eq!(b.divide(&ragged).unwrap_err().code(), "INCOMPATIBLE_DIMENSIONS");
    }
}
