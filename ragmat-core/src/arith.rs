//! Safe arithmetic: the single entry point every matrix operation uses
//!
//! Operands are dispatched by kind. Two big integers operate directly; a big
//! integer and anything else coerce the other operand to an integer first;
//! everything else uses f64 arithmetic. The raw result is then re-validated
//! against the numeric tower, so precision loss surfaces as an error instead
//! of a silently wrong cell.

use std::fmt;
use std::str::FromStr;
use dashu_int::IBig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::error::{MatrixError, Result};
use crate::number::{BigInteger, NumericValue};

/// Binary arithmetic operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
}

/// Error for an unrecognized operation name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operation: {0}")]
pub struct ParseOpError(String);

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Add => "ADD",
            Op::Subtract => "SUBTRACT",
            Op::Multiply => "MULTIPLY",
            Op::Divide => "DIVIDE",
            Op::Mod => "MOD",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Subtract => "-",
            Op::Multiply => "*",
            Op::Divide => "/",
            Op::Mod => "%",
        }
    }

    fn apply_f64(self, a: f64, b: f64) -> f64 {
        match self {
            Op::Add => a + b,
            Op::Subtract => a - b,
            Op::Multiply => a * b,
            Op::Divide => a / b,
            Op::Mod => a % b,
        }
    }

    /// Division and remainder truncate toward zero
    fn apply_big(self, a: &IBig, b: &IBig) -> Result<IBig> {
        match self {
            Op::Add => Ok(a + b),
            Op::Subtract => Ok(a - b),
            Op::Multiply => Ok(a * b),
            Op::Divide | Op::Mod if *b == IBig::ZERO => {
                Err(MatrixError::unsafe_result(self, format!("{}n {} 0", a, self.symbol())))
            }
            Op::Divide => Ok(a / b),
            Op::Mod => Ok(a % b),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Op {
    type Err = ParseOpError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADD" => Ok(Op::Add),
            "SUBTRACT" => Ok(Op::Subtract),
            "MULTIPLY" => Ok(Op::Multiply),
            "DIVIDE" => Ok(Op::Divide),
            "MOD" => Ok(Op::Mod),
            _ => Err(ParseOpError(s.to_string())),
        }
    }
}

/// Combine two possibly-empty operands. `None` stands for an empty cell.
pub fn combine(a: Option<&NumericValue>, b: Option<&NumericValue>, op: Op) -> Result<NumericValue> {
    match (a, b) {
        (Some(a), Some(b)) => combine_values(a, b, op),
        _ => Err(MatrixError::null_operand(op)),
    }
}

/// Combine two values and re-validate the result
pub fn combine_values(a: &NumericValue, b: &NumericValue, op: Op) -> Result<NumericValue> {
    match (a, b) {
        (NumericValue::BigInteger(x), NumericValue::BigInteger(y)) => {
            unit_denominator(y, op)?;
            big_result(x, op.apply_big(x.num(), y.num())?, op)
        }
        (NumericValue::BigInteger(x), other) => {
            let y = coerce(other, op)?;
            big_result(x, op.apply_big(x.num(), &y)?, op)
        }
        (other, NumericValue::BigInteger(y)) => {
            let x = coerce(other, op)?;
            big_result(y, op.apply_big(&x, y.num())?, op)
        }
        _ => {
            let raw = op.apply_f64(a.to_f64(), b.to_f64());
            NumericValue::classify_f64(raw).ok_or_else(|| {
                MatrixError::unsafe_result(op, format!("{} {} {} = {}", a, op.symbol(), b, raw))
            })
        }
    }
}

/// Round a non-big operand into the big-integer domain
fn coerce(value: &NumericValue, op: Op) -> Result<IBig> {
    value.to_ibig_rounded()
        .ok_or_else(|| MatrixError::unsafe_result(op, format!("{} cannot be coerced to a big integer", value)))
}

fn unit_denominator(value: &BigInteger, op: Op) -> Result<()> {
    if *value.denom() == IBig::ONE {
        Ok(())
    } else {
        Err(MatrixError::unsafe_result(op, format!("{} has a non-unit denominator", value)))
    }
}

/// Scale a raw big result by the carrying operand's denominator and range-check it
fn big_result(carrier: &BigInteger, raw: IBig, op: Op) -> Result<NumericValue> {
    unit_denominator(carrier, op)?;
    let scaled = raw / carrier.denom();
    BigInteger::new(scaled)
        .map(NumericValue::BigInteger)
        .map_err(|_| MatrixError::unsafe_result(op, "big integer result exceeds ±(2^64-1)"))
}
