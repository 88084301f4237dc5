//! Structural operations: transpose, scalar transforms, equality and reductions

use std::cmp::Ordering;
use std::str::FromStr;
use ragmat_core::limits::is_safe_integer;
use ragmat_core::{combine, combine_values, MatrixError, NumericValue, Op, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;
use crate::types::{Coord, SparseMatrix};

/// Direction of a reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    fn prefers(self, ordering: Ordering) -> bool {
        match self {
            Extremum::Min => ordering == Ordering::Less,
            Extremum::Max => ordering == Ordering::Greater,
        }
    }
}

/// Axis selector for `mean`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Col,
}

impl Axis {
    fn selects(self, coord: Coord, index: i64) -> bool {
        let at = match self {
            Axis::Row => coord.row,
            Axis::Col => coord.col,
        };
        i64::try_from(at).map_or(false, |at| at == index)
    }
}

impl FromStr for Axis {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "row" => Ok(Axis::Row),
            "col" => Ok(Axis::Col),
            _ => Err(MatrixError::invalid_axis(s)),
        }
    }
}

impl SparseMatrix {
    /// Swap rows and columns. Ragged shapes transpose too.
    pub fn transpose(&self) -> SparseMatrix {
        let shape = self.shape().transpose();
        let cells = self.iter()
            .map(|(coord, value)| (coord.transposed(), value.cloned()))
            .collect();
        trace!(from = %self.shape(), to = %shape, "transpose");
        SparseMatrix::from_parts(shape, cells)
    }

    /// Apply `cell op scalar` to every cell. Empty cells fail with `NullOperand`.
    pub fn scalar_transform(&self, scalar: &NumericValue, op: Op) -> Result<SparseMatrix> {
        if !matches!(scalar, NumericValue::SafeInteger(_) | NumericValue::SafeFloat(_)) || !scalar.is_safe() {
            return Err(MatrixError::unsafe_value(scalar));
        }

        let mut result = SparseMatrix::with_shape(self.shape().clone());
        for (coord, value) in self.iter() {
            result.put(coord, combine(value, Some(scalar), op)?);
        }
        Ok(result)
    }

    pub fn add_by(&self, scalar: &NumericValue) -> Result<SparseMatrix> {
        self.scalar_transform(scalar, Op::Add)
    }

    pub fn subtract_by(&self, scalar: &NumericValue) -> Result<SparseMatrix> {
        self.scalar_transform(scalar, Op::Subtract)
    }

    pub fn multiply_by(&self, scalar: &NumericValue) -> Result<SparseMatrix> {
        self.scalar_transform(scalar, Op::Multiply)
    }

    pub fn divide_by(&self, scalar: &NumericValue) -> Result<SparseMatrix> {
        self.scalar_transform(scalar, Op::Divide)
    }

    pub fn modulo_by(&self, scalar: &NumericValue) -> Result<SparseMatrix> {
        self.scalar_transform(scalar, Op::Mod)
    }

    /// Same cell count and every cell of `self` holds the same value in `other`
    pub fn equals(&self, other: &SparseMatrix) -> bool {
        self.size() == other.size()
            && self.iter().all(|(coord, value)| {
                other.get(coord.row, coord.col).map_or(false, |v| v == value)
            })
    }

    /// First coordinate, row-major, holding `value`
    pub fn find(&self, value: &NumericValue) -> Option<Coord> {
        self.iter()
            .find(|(_, v)| *v == Some(value))
            .map(|(coord, _)| coord)
    }

    /// Extremal non-empty cell; ties keep the first seen
    pub fn reduce(&self, extremum: Extremum) -> Option<(Coord, NumericValue)> {
        let mut best: Option<(Coord, &NumericValue)> = None;
        for (coord, value) in self.iter() {
            let Some(value) = value else { continue };
            best = match best {
                Some((_, current)) if value.numeric_cmp(current).map_or(false, |o| extremum.prefers(o)) => {
                    Some((coord, value))
                }
                None => Some((coord, value)),
                kept => kept,
            };
        }
        best.map(|(coord, value)| (coord, value.clone()))
    }

    pub fn min(&self) -> Option<(Coord, NumericValue)> {
        self.reduce(Extremum::Min)
    }

    pub fn max(&self) -> Option<(Coord, NumericValue)> {
        self.reduce(Extremum::Max)
    }

    /// Mean along one row or column; empty cells count as zero
    pub fn mean(&self, axis: Axis, index: i64) -> Result<NumericValue> {
        if !is_safe_integer(index) {
            return Err(MatrixError::invalid_index(index));
        }

        let zero = NumericValue::from(0);
        let mut sum = zero.clone();
        let mut count: i64 = 0;
        for (coord, value) in self.iter().filter(|(c, _)| axis.selects(*c, index)) {
            sum = combine_values(&sum, value.unwrap_or(&zero), Op::Add)?;
            count += 1;
        }
        combine_values(&sum, &NumericValue::SafeInteger(count), Op::Divide)
    }
}

impl PartialEq for SparseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashu_int::IBig;

    fn m(rows: &[&[i32]]) -> SparseMatrix {
        SparseMatrix::from_rows(
            rows.iter().map(|r| r.iter().map(|v| NumericValue::from(*v)).collect()).collect()
        ).unwrap()
    }

    fn float(x: f64) -> NumericValue {
        NumericValue::float(x).unwrap()
    }

    #[test]
    fn test_transpose() {
        let a = m(&[&[1, 2, 3], &[4, 5, 6]]);
        let t = a.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), Some(2));
        assert_eq!(t, m(&[&[1, 4], &[2, 5], &[3, 6]]));
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn test_transpose_ragged_is_involution() {
        let mut a = SparseMatrix::new(3, vec![3, 1, 2]).unwrap();
        a.set(0, 2, NumericValue::from(9)).unwrap();
        a.set(2, 1, NumericValue::from(4)).unwrap();
        let t = a.transpose();
        assert_eq!(t.get(2, 0).unwrap(), Some(&NumericValue::from(9)));
        assert_eq!(t.get(1, 2).unwrap(), Some(&NumericValue::from(4)));
        assert!(t.get(1, 1).is_err());
        assert_eq!(t.transpose(), a);
        assert_eq!(t.transpose().shape(), a.shape());
    }

    #[test]
    fn test_scalar_transform() {
        let a = m(&[&[1, 2], &[3, 4]]);
        assert_eq!(a.multiply_by(&NumericValue::from(3)).unwrap(), m(&[&[3, 6], &[9, 12]]));
        assert_eq!(a.add_by(&NumericValue::from(-1)).unwrap(), m(&[&[0, 1], &[2, 3]]));
        assert_eq!(a.subtract_by(&NumericValue::from(1)).unwrap(), m(&[&[0, 1], &[2, 3]]));
        assert_eq!(a.modulo_by(&NumericValue::from(2)).unwrap(), m(&[&[1, 0], &[1, 0]]));

        let halves = a.divide_by(&NumericValue::from(2)).unwrap();
        assert_eq!(halves.get(0, 0).unwrap(), Some(&float(0.5)));
        assert_eq!(halves.get(1, 1).unwrap(), Some(&NumericValue::from(2)));
    }

    #[test]
    fn test_scalar_transform_failures() {
        let mut a = SparseMatrix::new(1, 2).unwrap();
        a.set(0, 0, NumericValue::from(1)).unwrap();
        let err = a.multiply_by(&NumericValue::from(2)).unwrap_err();
        assert_eq!(err.code(), "NULL_OPERAND");

        a.set(0, 1, NumericValue::from(1)).unwrap();
        let big = NumericValue::big(IBig::from(5)).unwrap();
        assert_eq!(a.add_by(&big).unwrap_err().code(), "UNSAFE_VALUE");
        assert_eq!(a.divide_by(&NumericValue::from(0)).unwrap_err().code(), "UNSAFE_RESULT");
    }

    #[test]
    fn test_equals() {
        let a = m(&[&[1, 2], &[3, 4]]);
        let b = m(&[&[1, 2], &[3, 4]]);
        let c = m(&[&[1, 2], &[3, 5]]);
        let d = m(&[&[1, 2, 3], &[3, 4, 5]]);
        assert!(a.equals(&a));
        assert!(a.equals(&b) && b.equals(&a));
        assert!(!a.equals(&c));
        assert!(!a.equals(&d));
        assert_ne!(a, SparseMatrix::new(2, 2).unwrap());
    }

    #[test]
    fn test_find() {
        let a = m(&[&[5, 7], &[7, 1]]);
        assert_eq!(a.find(&NumericValue::from(7)), Some(Coord::new(0, 1)));
        assert_eq!(a.find(&NumericValue::from(8)), None);
    }

    #[test]
    fn test_min_max() {
        let mut a = SparseMatrix::new(2, 3).unwrap();
        a.set(0, 1, NumericValue::from(4)).unwrap();
        a.set(1, 0, float(-2.5)).unwrap();
        a.set(1, 2, NumericValue::from(4)).unwrap();
        a.set(0, 2, NumericValue::big(IBig::from(-1)).unwrap()).unwrap();

        assert_eq!(a.max(), Some((Coord::new(0, 1), NumericValue::from(4))));
        assert_eq!(a.min(), Some((Coord::new(1, 0), float(-2.5))));
        assert_eq!(SparseMatrix::new(2, 2).unwrap().max(), None);
    }

    #[test]
    fn test_mean() {
        let mut a = m(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(a.mean(Axis::Row, 0).unwrap(), NumericValue::from(2));
        assert_eq!(a.mean(Axis::Col, 1).unwrap(), float(3.5));

        a.delete(1, 2).unwrap();
        assert_eq!(a.mean(Axis::Row, 1).unwrap(), NumericValue::from(3));
    }

    #[test]
    fn test_mean_failures() {
        let a = m(&[&[1, 2], &[3, 4]]);
        assert_eq!("diag".parse::<Axis>().unwrap_err().code(), "INVALID_AXIS");
        assert_eq!("col".parse::<Axis>().unwrap(), Axis::Col);
        assert_eq!(a.mean(Axis::Row, i64::MAX).unwrap_err().code(), "INVALID_INDEX");
        assert_eq!(a.mean(Axis::Row, 7).unwrap_err().code(), "UNSAFE_RESULT");
    }
}
