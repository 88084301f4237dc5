//! Helper functions for matrix operations

use ragmat_core::limits::DETERMINANT_WARN_SIZE;
use ragmat_core::{MatrixError, NumericValue, Result};
use tracing::warn;
use crate::types::SparseMatrix;

/// Check that a matrix is square, returning its order
pub fn check_square(m: &SparseMatrix, operation: &str) -> Result<usize> {
    if !m.is_square() {
        let cols = match m.cols() {
            Some(c) => c.to_string(),
            None => "ragged".to_string(),
        };
        return Err(MatrixError::non_square(operation, m.rows(), cols));
    }
    Ok(m.rows())
}

/// Check that the left operand's width matches the right operand's height
pub fn check_matmul_dims(a: &SparseMatrix, b: &SparseMatrix, operation: &str) -> Result<()> {
    if a.max_cols() != b.rows() {
        return Err(MatrixError::incompatible(format!(
            "{}: {} and {} (inner {} vs {})",
            operation, a.shape(), b.shape(), a.max_cols(), b.rows()
        )));
    }
    Ok(())
}

/// Column count of a rectangular matrix
pub fn rectangular_cols(m: &SparseMatrix, operation: &str) -> Result<usize> {
    m.cols().ok_or_else(|| {
        MatrixError::incompatible(format!("{}: {} matrix is not rectangular", operation, m.shape()))
    })
}

/// Index list with the entry at `position` removed
pub fn without(indices: &[usize], position: usize) -> Vec<usize> {
    indices.iter()
        .enumerate()
        .filter(|(i, _)| *i != position)
        .map(|(_, idx)| *idx)
        .collect()
}

/// Checkerboard sign (-1)^i
pub fn sign(i: usize) -> NumericValue {
    if i % 2 == 0 { NumericValue::from(1) } else { NumericValue::from(-1) }
}

/// Cofactor expansion is factorial in the order
pub fn warn_if_expensive(n: usize, operation: &str) {
    if n > DETERMINANT_WARN_SIZE {
        warn!(n, operation, "cofactor expansion on a large matrix; expect factorial running time");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without() {
        assert_eq!(without(&[0, 1, 2, 3], 0), vec![1, 2, 3]);
        assert_eq!(without(&[4, 7, 9], 1), vec![4, 9]);
        assert!(without(&[5], 0).is_empty());
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(0), NumericValue::from(1));
        assert_eq!(sign(3), NumericValue::from(-1));
    }

    #[test]
    fn test_check_square() {
        let m = SparseMatrix::new(3, 3).unwrap();
        assert_eq!(check_square(&m, "determinant").unwrap(), 3);

        let r = SparseMatrix::new(2, vec![2, 1]).unwrap();
        let err = check_square(&r, "determinant").unwrap_err();
        assert_eq!(err.code(), "NON_SQUARE");
        assert!(err.to_string().contains("ragged"));
    }

    #[test]
    fn test_check_matmul_dims() {
        let a = SparseMatrix::new(2, 3).unwrap();
        let b = SparseMatrix::new(3, 4).unwrap();
        assert!(check_matmul_dims(&a, &b, "multiply").is_ok());
        assert_eq!(check_matmul_dims(&b, &a, "multiply").unwrap_err().code(), "INCOMPATIBLE_DIMENSIONS");
    }
}
