//! Numeric Types
//!
//! Operation arguments and computed results.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use serde::{Serialize, Serializer};
use serde_json::Value;

// == Arg ==
/// A single operation argument.
///
/// Integers and floats stay distinct so that `2` and `2.0` produce
/// different cache keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg {
    Int(i64),
    Float(f64),
}

impl Arg {
    /// Converts a JSON value into an argument, or None if it is not a number.
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Number(number) = value else {
            return None;
        };
        if let Some(i) = number.as_i64() {
            Some(Arg::Int(i))
        } else {
            number.as_f64().map(Arg::Float)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Arg::Int(i) => i as f64,
            Arg::Float(f) => f,
        }
    }

    /// Integer value of an int, or of a finite float with no fractional part.
    pub fn as_whole(&self) -> Option<i64> {
        match *self {
            Arg::Int(i) => Some(i),
            Arg::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(f as i64)
            }
            Arg::Float(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match *self {
            Arg::Int(i) => Value::from(i),
            Arg::Float(f) => Value::from(f),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(i) => write!(f, "{}", i),
            // Debug keeps the `.0` / exponent marker on whole floats
            Arg::Float(v) => write!(f, "{:?}", v),
        }
    }
}

// == Number ==
/// A computed result.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Exact integer of arbitrary size
    Integer(BigInt),
    /// Floating point value, always finite
    Float(f64),
}

impl Number {
    /// Lossy conversion used for magnitude checks and display.
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => i.to_f64().unwrap_or(f64::INFINITY),
            Number::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Integer(value)
    }
}

impl From<BigUint> for Number {
    fn from(value: BigUint) -> Self {
        Number::Integer(BigInt::from(value))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(BigInt::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Integers that fit in 64 bits serialize as JSON numbers; larger ones as
/// decimal strings so no digits are lost.
impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Integer(i) => {
                if let Some(v) = i.to_i64() {
                    serializer.serialize_i64(v)
                } else if let Some(v) = i.to_u64() {
                    serializer.serialize_u64(v)
                } else {
                    serializer.serialize_str(&i.to_string())
                }
            }
            Number::Float(v) => serializer.serialize_f64(*v),
        }
    }
}
