//! The numeric tower: safe integers, safe floats and bounded big integers
//!
//! Every value stored in a matrix or produced by arithmetic satisfies
//! exactly one of the three predicates below. Anything else is rejected at
//! construction time with `MatrixError::UnsafeValue`.

use std::cmp::Ordering;
use std::fmt;
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::error::{MatrixError, Result};
use crate::limits::{is_safe_big, is_safe_float, is_safe_integer, MAX_SAFE_BIG, MAX_SAFE_INTEGER};

/// Which of the three safe ranges a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    SafeInteger,
    SafeFloat,
    BigInteger,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::SafeInteger => "SafeInteger",
            ValueKind::SafeFloat => "SafeFloat",
            ValueKind::BigInteger => "BigInteger",
        };
        f.write_str(name)
    }
}

/// Arbitrary precision integer bounded to ±(2^64 - 1)
///
/// Carries a denominator that is always 1. It is reserved for rational
/// support and never observably differs from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigInteger {
    num: IBig,
    denom: IBig,
}

impl BigInteger {
    /// Create from a numerator, checking the big-integer range
    pub fn new(num: IBig) -> Result<Self> {
        if !is_safe_big(&num) {
            return Err(MatrixError::unsafe_value(format!("{}n", num)));
        }
        Ok(Self { num, denom: IBig::ONE })
    }

    pub fn num(&self) -> &IBig {
        &self.num
    }

    pub fn denom(&self) -> &IBig {
        &self.denom
    }

    pub fn is_safe(&self) -> bool {
        is_safe_big(&self.num) && self.denom == IBig::ONE
    }

    /// Exact value as i128 (always representable inside the safe range)
    pub fn to_i128(&self) -> i128 {
        match i128::try_from(self.num.clone()) {
            Ok(v) => v,
            Err(_) if self.num < IBig::ZERO => i128::MIN,
            Err(_) => i128::MAX,
        }
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}n", self.num)
    }
}

impl Serialize for BigInteger {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.num.to_string())
    }
}

impl<'de> Deserialize<'de> for BigInteger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let num: IBig = s.trim().parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid big integer: {}", s)))?;
        Self::new(num).map_err(serde::de::Error::custom)
    }
}

/// A matrix cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum NumericValue {
    /// Exact integer within ±(2^53 - 1)
    SafeInteger(i64),
    /// Finite, non-integral float of usable magnitude
    SafeFloat(f64),
    /// Integer within ±(2^64 - 1)
    BigInteger(BigInteger),
}

impl NumericValue {
    // ========== Construction ==========

    /// Create a safe integer
    pub fn integer(n: i64) -> Result<Self> {
        if is_safe_integer(n) {
            Ok(Self::SafeInteger(n))
        } else {
            Err(MatrixError::unsafe_value(n))
        }
    }

    /// Create from a float; integral floats become safe integers
    pub fn float(x: f64) -> Result<Self> {
        Self::classify_f64(x).ok_or_else(|| MatrixError::unsafe_value(x))
    }

    /// Create a big integer
    pub fn big(n: impl Into<IBig>) -> Result<Self> {
        BigInteger::new(n.into()).map(Self::BigInteger)
    }

    /// Classify a raw float result into the tower, if it fits anywhere
    pub fn classify_f64(x: f64) -> Option<Self> {
        if x.is_finite() && x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER as f64 {
            // -0.0 collapses to 0
            Some(Self::SafeInteger(x as i64))
        } else if is_safe_float(x) {
            Some(Self::SafeFloat(x))
        } else {
            None
        }
    }

    // ========== Predicates ==========

    /// Check the value against its own variant's range
    pub fn is_safe(&self) -> bool {
        match self {
            Self::SafeInteger(n) => is_safe_integer(*n),
            Self::SafeFloat(x) => is_safe_float(*x),
            Self::BigInteger(b) => b.is_safe(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::SafeInteger(_) => ValueKind::SafeInteger,
            Self::SafeFloat(_) => ValueKind::SafeFloat,
            Self::BigInteger(_) => ValueKind::BigInteger,
        }
    }

    pub fn is_big(&self) -> bool {
        matches!(self, Self::BigInteger(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::SafeInteger(n) => *n == 0,
            Self::SafeFloat(x) => *x == 0.0,
            Self::BigInteger(b) => *b.num() == IBig::ZERO,
        }
    }

    // ========== Conversion ==========

    /// Convert to f64 (big integers above 2^53 lose precision)
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::SafeInteger(n) => *n as f64,
            Self::SafeFloat(x) => *x,
            Self::BigInteger(b) => b.to_i128() as f64,
        }
    }

    /// Exact integer value, if this is not a float
    pub fn to_i128(&self) -> Option<i128> {
        match self {
            Self::SafeInteger(n) => Some(*n as i128),
            Self::SafeFloat(_) => None,
            Self::BigInteger(b) => Some(b.to_i128()),
        }
    }

    /// Coerce into the big-integer domain, rounding floats to nearest
    pub fn to_ibig_rounded(&self) -> Option<IBig> {
        match self {
            Self::SafeFloat(x) => float_to_ibig(x.round()),
            _ => self.to_ibig_truncated(),
        }
    }

    /// Coerce into the big-integer domain, truncating floats toward zero
    pub fn to_ibig_truncated(&self) -> Option<IBig> {
        match self {
            Self::SafeInteger(n) => Some(IBig::from(*n)),
            Self::SafeFloat(x) => float_to_ibig(x.trunc()),
            Self::BigInteger(b) => Some(b.num().clone()),
        }
    }

    /// Numeric comparison across variants.
    ///
    /// Integer and big-integer pairs compare exactly; any pair involving a
    /// float compares through f64. Equality (`==`) stays structural, so a
    /// `SafeInteger(5)` compares `Equal` to a `BigInteger(5)` here but is not
    /// `==` to it.
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.to_i128(), other.to_i128()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

/// Wire form of `NumericValue`, checked against its variant's range on the way in
#[derive(Deserialize)]
#[serde(tag = "type", content = "value")]
enum RawValue {
    SafeInteger(i64),
    SafeFloat(f64),
    BigInteger(BigInteger),
}

impl<'de> Deserialize<'de> for NumericValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = match RawValue::deserialize(deserializer)? {
            RawValue::SafeInteger(n) => Self::integer(n),
            RawValue::SafeFloat(x) if is_safe_float(x) => Ok(Self::SafeFloat(x)),
            RawValue::SafeFloat(x) => Err(MatrixError::unsafe_value(x)),
            RawValue::BigInteger(b) => Ok(Self::BigInteger(b)),
        };
        value.map_err(serde::de::Error::custom)
    }
}

/// Convert an already integral float into a big integer inside the safe range
fn float_to_ibig(x: f64) -> Option<IBig> {
    if !x.is_finite() || x.abs() > MAX_SAFE_BIG as f64 {
        return None;
    }
    Some(IBig::from(x as i128))
}

// ========== Trait Implementations ==========

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SafeInteger(n) => write!(f, "{}", n),
            Self::SafeFloat(x) => write!(f, "{}", x),
            Self::BigInteger(b) => write!(f, "{}", b),
        }
    }
}

impl From<i32> for NumericValue {
    fn from(n: i32) -> Self {
        Self::SafeInteger(n as i64)
    }
}

impl From<BigInteger> for NumericValue {
    fn from(b: BigInteger) -> Self {
        Self::BigInteger(b)
    }
}

impl TryFrom<i64> for NumericValue {
    type Error = MatrixError;

    fn try_from(n: i64) -> Result<Self> {
        Self::integer(n)
    }
}

impl TryFrom<f64> for NumericValue {
    type Error = MatrixError;

    fn try_from(x: f64) -> Result<Self> {
        Self::float(x)
    }
}

impl TryFrom<IBig> for NumericValue {
    type Error = MatrixError;

    fn try_from(n: IBig) -> Result<Self> {
        Self::big(n)
    }
}
