//! Matrix product

use ragmat_core::{combine_values, MatrixError, NumericValue, Op, Result};
use tracing::debug;
use crate::helpers::check_matmul_dims;
use crate::types::{Coord, Shape, SparseMatrix};

impl SparseMatrix {
    /// Row-by-column product. Missing and empty cells count as zero.
    ///
    /// When any partial product of a cell is a big integer, every partial
    /// product of that cell is moved into the big domain (floats truncated)
    /// before summing, so the cell comes out as a big integer.
    pub fn multiply(&self, other: &SparseMatrix) -> Result<SparseMatrix> {
        check_matmul_dims(self, other, "multiply")?;
        let inner = self.max_cols();
        let shape = Shape::new(self.rows(), other.max_cols())?;
        debug!(left = %self.shape(), right = %other.shape(), "multiply");

        let zero = NumericValue::from(0);
        let mut result = SparseMatrix::with_shape(shape);
        for i in 0..self.rows() {
            for j in 0..other.max_cols() {
                let partials = (0..inner)
                    .map(|k| {
                        let a = self.value_at(i, k).unwrap_or(&zero);
                        let b = other.value_at(k, j).unwrap_or(&zero);
                        combine_values(a, b, Op::Multiply)
                    })
                    .collect::<Result<Vec<_>>>()?;
                result.put(Coord::new(i, j), sum_partials(partials)?);
            }
        }
        Ok(result)
    }
}

fn sum_partials(partials: Vec<NumericValue>) -> Result<NumericValue> {
    let partials = if partials.iter().any(NumericValue::is_big) {
        partials.into_iter().map(into_big).collect::<Result<Vec<_>>>()?
    } else {
        partials
    };

    let mut iter = partials.into_iter();
    let mut sum = iter.next().unwrap_or(NumericValue::from(0));
    for value in iter {
        sum = combine_values(&sum, &value, Op::Add)?;
    }
    Ok(sum)
}

fn into_big(value: NumericValue) -> Result<NumericValue> {
    if value.is_big() {
        return Ok(value);
    }
    let truncated = value.to_ibig_truncated().ok_or_else(|| {
        MatrixError::unsafe_result(Op::Multiply, format!("{} cannot be coerced to a big integer", value))
    })?;
    NumericValue::big(truncated)
}
