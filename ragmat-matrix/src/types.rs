//! Core matrix types: coordinates, shapes and the sparse cell store

use std::collections::BTreeMap;
use std::fmt;
use nalgebra::DMatrix;
use ragmat_core::limits::{is_safe_matrix_length, SAFE_MATRIX_SIZE};
use ragmat_core::{MatrixError, NumericValue, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A (row, col) address. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn transposed(self) -> Self {
        Self { row: self.col, col: self.row }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Column specification given at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColSpec {
    /// Every row has the same width
    Uniform(usize),
    /// Row i has `widths[i]` columns
    Ragged(Vec<usize>),
}

impl From<usize> for ColSpec {
    fn from(cols: usize) -> Self {
        ColSpec::Uniform(cols)
    }
}

impl From<Vec<usize>> for ColSpec {
    fn from(widths: Vec<usize>) -> Self {
        ColSpec::Ragged(widths)
    }
}

impl From<&[usize]> for ColSpec {
    fn from(widths: &[usize]) -> Self {
        ColSpec::Ragged(widths.to_vec())
    }
}

/// The set of addressable coordinates of a matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Rectangular
    Uniform { rows: usize, cols: usize },
    /// Row i spans columns `0..widths[i]`
    Ragged { widths: Vec<usize> },
    /// The inner shape with rows and columns swapped
    Transposed(Box<Shape>),
}

impl Shape {
    /// Validate a row count and column specification
    pub fn new(rows: usize, cols: impl Into<ColSpec>) -> Result<Self> {
        if !is_safe_matrix_length(rows) {
            return Err(MatrixError::shape("row", format!("{} is outside 1..={}", rows, SAFE_MATRIX_SIZE)));
        }

        match cols.into() {
            ColSpec::Uniform(cols) => {
                if !is_safe_matrix_length(cols) {
                    return Err(MatrixError::shape("column", format!("{} is outside 1..={}", cols, SAFE_MATRIX_SIZE)));
                }
                Ok(Shape::Uniform { rows, cols })
            }
            ColSpec::Ragged(widths) => {
                if widths.len() != rows {
                    return Err(MatrixError::shape("column", format!(
                        "{} widths given for {} rows", widths.len(), rows
                    )));
                }
                if let Some((i, w)) = widths.iter().enumerate().find(|(_, w)| !is_safe_matrix_length(**w)) {
                    return Err(MatrixError::shape("column", format!(
                        "row {} width {} is outside 1..={}", i, w, SAFE_MATRIX_SIZE
                    )));
                }
                Ok(Shape::Ragged { widths })
            }
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        match self {
            Shape::Uniform { rows, .. } => *rows,
            Shape::Ragged { widths } => widths.len(),
            Shape::Transposed(inner) => inner.max_cols(),
        }
    }

    /// Width of the widest row
    pub fn max_cols(&self) -> usize {
        match self {
            Shape::Uniform { cols, .. } => *cols,
            Shape::Ragged { widths } => widths.iter().copied().max().unwrap_or(0),
            Shape::Transposed(inner) => inner.rows(),
        }
    }

    /// Column count when every row has the same width
    pub fn cols(&self) -> Option<usize> {
        match self {
            Shape::Uniform { cols, .. } => Some(*cols),
            Shape::Ragged { widths } => {
                let first = *widths.first()?;
                widths.iter().all(|w| *w == first).then_some(first)
            }
            Shape::Transposed(inner) => inner.cols().map(|_| inner.rows()),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        match self {
            Shape::Uniform { rows, cols } => row < *rows && col < *cols,
            Shape::Ragged { widths } => widths.get(row).map_or(false, |w| col < *w),
            Shape::Transposed(inner) => inner.contains(col, row),
        }
    }

    /// Number of addressable cells
    pub fn size(&self) -> usize {
        match self {
            Shape::Uniform { rows, cols } => rows * cols,
            Shape::Ragged { widths } => widths.iter().sum(),
            Shape::Transposed(inner) => inner.size(),
        }
    }

    /// Square iff every row is as wide as there are rows
    pub fn is_square(&self) -> bool {
        match self {
            Shape::Uniform { rows, cols } => rows == cols,
            Shape::Ragged { widths } => widths.iter().all(|w| *w == widths.len()),
            Shape::Transposed(inner) => inner.is_square(),
        }
    }

    /// Swap rows and columns
    pub fn transpose(&self) -> Shape {
        match self {
            Shape::Uniform { rows, cols } => Shape::Uniform { rows: *cols, cols: *rows },
            Shape::Ragged { .. } => Shape::Transposed(Box::new(self.clone())),
            Shape::Transposed(inner) => (**inner).clone(),
        }
    }

    /// All addressable coordinates, row-major
    pub fn coords(&self) -> Vec<Coord> {
        match self {
            Shape::Uniform { rows, cols } => (0..*rows)
                .flat_map(|r| (0..*cols).map(move |c| Coord::new(r, c)))
                .collect(),
            Shape::Ragged { widths } => widths.iter().enumerate()
                .flat_map(|(r, w)| (0..*w).map(move |c| Coord::new(r, c)))
                .collect(),
            Shape::Transposed(inner) => {
                let mut coords: Vec<Coord> = inner.coords().into_iter().map(Coord::transposed).collect();
                coords.sort();
                coords
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Uniform { rows, cols } => write!(f, "{}×{}", rows, cols),
            Shape::Ragged { widths } => write!(f, "ragged{:?}", widths),
            Shape::Transposed(inner) => write!(f, "transposed({})", inner),
        }
    }
}

/// A coordinate-addressed matrix whose cells start empty
///
/// The cell map holds exactly one entry per coordinate of the shape, `None`
/// meaning empty. Iteration is always row-major.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    shape: Shape,
    cells: BTreeMap<Coord, Option<NumericValue>>,
}

impl SparseMatrix {
    /// Create an all-empty matrix, validating the shape
    pub fn new(rows: usize, cols: impl Into<ColSpec>) -> Result<Self> {
        Ok(Self::with_shape(Shape::new(rows, cols)?))
    }

    /// Create an all-empty matrix of an already validated shape
    pub(crate) fn with_shape(shape: Shape) -> Self {
        let cells: BTreeMap<_, _> = shape.coords().into_iter().map(|c| (c, None)).collect();
        trace!(shape = %shape, size = cells.len(), "allocated matrix");
        Self { shape, cells }
    }

    pub(crate) fn from_parts(shape: Shape, cells: BTreeMap<Coord, Option<NumericValue>>) -> Self {
        Self { shape, cells }
    }

    /// Build from nested rows; rows of differing length produce a ragged matrix
    pub fn from_rows(data: Vec<Vec<NumericValue>>) -> Result<Self> {
        let widths: Vec<usize> = data.iter().map(Vec::len).collect();
        let first = widths.first().copied().unwrap_or(0);
        let mut m = if widths.iter().all(|w| *w == first) {
            Self::new(widths.len(), first)?
        } else {
            Self::new(widths.len(), widths)?
        };

        for (i, row) in data.into_iter().enumerate() {
            for (j, value) in row.into_iter().enumerate() {
                m.set(i, j, value)?;
            }
        }
        Ok(m)
    }

    /// n×n identity
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::new(n, n)?;
        for i in 0..n {
            for j in 0..n {
                m.set(i, j, NumericValue::from(i32::from(i == j)))?;
            }
        }
        Ok(m)
    }

    // ========== Shape ==========

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    /// Column count, `None` for a ragged matrix
    pub fn cols(&self) -> Option<usize> {
        self.shape.cols()
    }

    pub fn max_cols(&self) -> usize {
        self.shape.max_cols()
    }

    /// Number of addressable cells
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn is_square(&self) -> bool {
        self.shape.is_square()
    }

    // ========== Cell Access ==========

    /// Get a cell; `None` means the cell is empty
    pub fn get(&self, row: usize, col: usize) -> Result<Option<&NumericValue>> {
        self.cells.get(&Coord::new(row, col))
            .map(Option::as_ref)
            .ok_or_else(|| MatrixError::coordinate(row, col))
    }

    /// Set a cell to a safe value
    pub fn set(&mut self, row: usize, col: usize, value: NumericValue) -> Result<()> {
        if !value.is_safe() {
            return Err(MatrixError::unsafe_value(&value));
        }
        let cell = self.cells.get_mut(&Coord::new(row, col))
            .ok_or_else(|| MatrixError::coordinate(row, col))?;
        *cell = Some(value);
        Ok(())
    }

    /// Empty a cell
    pub fn delete(&mut self, row: usize, col: usize) -> Result<()> {
        let cell = self.cells.get_mut(&Coord::new(row, col))
            .ok_or_else(|| MatrixError::coordinate(row, col))?;
        *cell = None;
        Ok(())
    }

    /// Iterate over every cell, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Option<&NumericValue>)> + '_ {
        self.cells.iter().map(|(c, v)| (*c, v.as_ref()))
    }

    /// Value at a coordinate; missing and empty cells both read as `None`
    pub(crate) fn value_at(&self, row: usize, col: usize) -> Option<&NumericValue> {
        self.cells.get(&Coord::new(row, col)).and_then(Option::as_ref)
    }

    pub(crate) fn put(&mut self, coord: Coord, value: NumericValue) {
        self.cells.insert(coord, Some(value));
    }

    // ========== Conversion ==========

    /// Nested rows of cells, ragged rows kept at their own width.
    ///
    /// Fails when a row skips a column (the transpose of some ragged shapes),
    /// since nested rows cannot place a cell after a gap.
    pub fn to_rows(&self) -> Result<Vec<Vec<Option<NumericValue>>>> {
        let mut rows: Vec<Vec<Option<NumericValue>>> = vec![Vec::new(); self.rows()];
        for (coord, value) in &self.cells {
            let row = &mut rows[coord.row];
            if row.len() != coord.col {
                return Err(MatrixError::incompatible(format!(
                    "{} matrix row {} skips column {}", self.shape, coord.row, row.len()
                )));
            }
            row.push(value.clone());
        }
        Ok(rows)
    }

    /// Convert to f64 DMatrix (rectangular and fully populated only)
    pub fn to_dmatrix(&self) -> Result<DMatrix<f64>> {
        let cols = self.cols().ok_or_else(|| {
            MatrixError::incompatible(format!("{} matrix has no rectangular form", self.shape))
        })?;
        let mut result = DMatrix::zeros(self.rows(), cols);
        for (coord, value) in &self.cells {
            let value = value.as_ref().ok_or_else(|| MatrixError::null_operand("to_dmatrix"))?;
            result[(coord.row, coord.col)] = value.to_f64();
        }
        Ok(result)
    }

    /// Create from nalgebra DMatrix
    pub fn from_dmatrix(data: &DMatrix<f64>) -> Result<Self> {
        let mut m = Self::new(data.nrows(), data.ncols())?;
        for i in 0..data.nrows() {
            for j in 0..data.ncols() {
                m.set(i, j, NumericValue::float(data[(i, j)])?)?;
            }
        }
        Ok(m)
    }
}

/// Nested brackets, `_` for an empty cell and `·` for a column outside the shape
impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut current: Option<usize> = None;
        let mut next_col = 0;
        for (coord, value) in self.iter() {
            if current == Some(coord.row) {
                write!(f, ", ")?;
            } else {
                if current.is_some() {
                    write!(f, "], ")?;
                }
                write!(f, "[")?;
                current = Some(coord.row);
                next_col = 0;
            }
            for _ in next_col..coord.col {
                write!(f, "·, ")?;
            }
            match value {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "_")?,
            }
            next_col = coord.col + 1;
        }
        if current.is_some() {
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
