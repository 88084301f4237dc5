//! Structured errors for matrix computations
//!
//! Every failure is reported to the caller immediately, carrying enough
//! context (coordinate, dimensions or value) to diagnose it without
//! re-running the computation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const SHAPE_ERROR: &str = "SHAPE_ERROR";
    pub const COORDINATE_ERROR: &str = "COORDINATE_ERROR";
    pub const UNSAFE_VALUE: &str = "UNSAFE_VALUE";
    pub const UNSAFE_RESULT: &str = "UNSAFE_RESULT";
    pub const NULL_OPERAND: &str = "NULL_OPERAND";
    pub const NON_SQUARE: &str = "NON_SQUARE";
    pub const SINGULAR_MATRIX: &str = "SINGULAR_MATRIX";
    pub const RANK_DEFICIENT: &str = "RANK_DEFICIENT";
    pub const INCOMPATIBLE_DIMENSIONS: &str = "INCOMPATIBLE_DIMENSIONS";
    pub const INVALID_AXIS: &str = "INVALID_AXIS";
    pub const INVALID_INDEX: &str = "INVALID_INDEX";
}

/// Error raised by matrix construction, access or arithmetic
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatrixError {
    #[serde(rename = "SHAPE_ERROR")]
    #[error("Unable to set matrix {dimension} size: {details}")]
    Shape { dimension: String, details: String },

    #[serde(rename = "COORDINATE_ERROR")]
    #[error("Coordinates ({row}, {col}) out of range")]
    Coordinate { row: usize, col: usize },

    #[error("Value must be a safe integer, float or big integer, got {value}")]
    UnsafeValue { value: String },

    #[error("Result of {op} must be a safe integer, float or big integer: {details}")]
    UnsafeResult { op: String, details: String },

    #[error("Unable to perform {op} on an empty value")]
    NullOperand { op: String },

    #[error("Cannot find {operation} of non-square matrix ({rows}×{cols})")]
    NonSquare { operation: String, rows: usize, cols: String },

    #[serde(rename = "SINGULAR_MATRIX")]
    #[error("Matrix is not invertible (determinant is {determinant})")]
    Singular { determinant: String },

    #[error("Pseudoinverse undefined: {rows}×{cols} matrix is not full rank")]
    RankDeficient { rows: usize, cols: usize },

    #[error("Incompatible dimensions: {details}")]
    IncompatibleDimensions { details: String },

    #[error("Axis must be either \"row\" or \"col\", got \"{axis}\"")]
    InvalidAxis { axis: String },

    #[error("Index must be a safe integer, got {index}")]
    InvalidIndex { index: String },
}

/// Result alias used throughout the workspace
pub type Result<T, E = MatrixError> = std::result::Result<T, E>;

impl MatrixError {
    // ========== Common Error Constructors ==========

    pub fn shape(dimension: &str, details: impl Into<String>) -> Self {
        Self::Shape { dimension: dimension.to_string(), details: details.into() }
    }

    pub fn coordinate(row: usize, col: usize) -> Self {
        Self::Coordinate { row, col }
    }

    pub fn unsafe_value(value: impl ToString) -> Self {
        Self::UnsafeValue { value: value.to_string() }
    }

    pub fn unsafe_result(op: impl ToString, details: impl Into<String>) -> Self {
        Self::UnsafeResult { op: op.to_string(), details: details.into() }
    }

    pub fn null_operand(op: impl ToString) -> Self {
        Self::NullOperand { op: op.to_string() }
    }

    pub fn non_square(operation: &str, rows: usize, cols: impl ToString) -> Self {
        Self::NonSquare { operation: operation.to_string(), rows, cols: cols.to_string() }
    }

    pub fn singular(determinant: impl ToString) -> Self {
        Self::Singular { determinant: determinant.to_string() }
    }

    pub fn rank_deficient(rows: usize, cols: usize) -> Self {
        Self::RankDeficient { rows, cols }
    }

    pub fn incompatible(details: impl Into<String>) -> Self {
        Self::IncompatibleDimensions { details: details.into() }
    }

    pub fn invalid_axis(axis: &str) -> Self {
        Self::InvalidAxis { axis: axis.to_string() }
    }

    pub fn invalid_index(index: impl ToString) -> Self {
        Self::InvalidIndex { index: index.to_string() }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Shape { .. } => codes::SHAPE_ERROR,
            Self::Coordinate { .. } => codes::COORDINATE_ERROR,
            Self::UnsafeValue { .. } => codes::UNSAFE_VALUE,
            Self::UnsafeResult { .. } => codes::UNSAFE_RESULT,
            Self::NullOperand { .. } => codes::NULL_OPERAND,
            Self::NonSquare { .. } => codes::NON_SQUARE,
            Self::Singular { .. } => codes::SINGULAR_MATRIX,
            Self::RankDeficient { .. } => codes::RANK_DEFICIENT,
            Self::IncompatibleDimensions { .. } => codes::INCOMPATIBLE_DIMENSIONS,
            Self::InvalidAxis { .. } => codes::INVALID_AXIS,
            Self::InvalidIndex { .. } => codes::INVALID_INDEX,
        }
    }

    /// Suggestion for fixing the error
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Shape { .. } => "Use between 1 and SAFE_MATRIX_SIZE rows and columns, one width per row when ragged",
            Self::Coordinate { .. } => "Check the row and column against the matrix shape",
            Self::UnsafeValue { .. } => "Use an integer within ±(2^53-1), a finite float, or a big integer within ±(2^64-1)",
            Self::UnsafeResult { .. } => "Keep operands small enough that the result stays in a safe range",
            Self::NullOperand { .. } => "Set every cell involved before computing",
            Self::NonSquare { .. } => "Use a matrix with as many columns as rows",
            Self::Singular { .. } => "The matrix has no inverse; check for linearly dependent rows",
            Self::RankDeficient { .. } => "The matrix has linearly dependent rows or columns",
            Self::IncompatibleDimensions { .. } => "The left operand's column count must match the right operand's row count",
            Self::InvalidAxis { .. } => "Use \"row\" or \"col\"",
            Self::InvalidIndex { .. } => "Use an integer within ±(2^53-1)",
        }
    }
}
