//! Computation Functions
//!
//! Pure implementations of the supported operations. Magnitudes are bounded
//! by the range of a 64-bit float: anything beyond `f64::MAX` is an overflow.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};

use crate::error::MathError;
use crate::math::{Arg, Number};

/// Largest n whose factorial fits in a 64-bit float (171! does not).
pub const FACTORIAL_OVERFLOW_THRESHOLD: i64 = 170;

/// Bit length past which an integer power certainly exceeds `f64::MAX`.
const F64_MAX_BITS: f64 = 1025.0;

// == Power ==
/// Raises `base` to `exponent`.
///
/// Two integers with a non-negative exponent produce an exact integer;
/// every other combination is computed in floating point.
pub fn power(base: Arg, exponent: Arg) -> Result<Number, MathError> {
    if let (Arg::Int(b), Arg::Int(e)) = (base, exponent) {
        if e >= 0 {
            return integer_power(b, e);
        }
    }

    let b = base.as_f64();
    let e = exponent.as_f64();
    if b == 0.0 && e < 0.0 {
        return Err(MathError::Domain(
            "Zero cannot be raised to a negative power".to_string(),
        ));
    }

    let result = b.powf(e);
    if result.is_nan() {
        return Err(MathError::Domain(
            "Negative base with a fractional exponent has no real result".to_string(),
        ));
    }
    if result.is_infinite() {
        return Err(overflow());
    }
    Ok(Number::Float(result))
}

fn integer_power(base: i64, exponent: i64) -> Result<Number, MathError> {
    match base {
        0 => return Ok(Number::from(if exponent == 0 { 1i64 } else { 0 })),
        1 => return Ok(Number::from(1i64)),
        -1 => return Ok(Number::from(if exponent % 2 == 0 { 1i64 } else { -1 })),
        _ => {}
    }

    // |base| >= 2 from here, so a cheap bit estimate rejects huge results
    // before any multiplication happens.
    let estimated_bits = exponent as f64 * (base.unsigned_abs() as f64).log2();
    if estimated_bits > F64_MAX_BITS {
        return Err(overflow());
    }

    let result = BigInt::from(base).pow(exponent as u32);
    match result.to_f64() {
        Some(v) if v.is_finite() => Ok(Number::Integer(result)),
        _ => Err(overflow()),
    }
}

fn overflow() -> MathError {
    MathError::Overflow("Result too large - calculation would cause overflow".to_string())
}

// == Fibonacci ==
/// Returns the nth Fibonacci number, 0-indexed: F(0) = 0, F(1) = 1.
///
/// Iterative, linear in `n`. The result grows exponentially (F(1000) has
/// 209 digits) so it is kept as an arbitrary-precision integer.
pub fn fibonacci(n: i64) -> Result<BigUint, MathError> {
    if n < 0 {
        return Err(MathError::Domain(
            "Fibonacci sequence is not defined for negative numbers".to_string(),
        ));
    }

    let mut a = BigUint::zero();
    let mut b = BigUint::one();
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    Ok(a)
}

// == Factorial ==
/// Returns n! exactly. 0! = 1.
pub fn factorial(n: i64) -> Result<BigUint, MathError> {
    if n < 0 {
        return Err(MathError::Domain(
            "Factorial is not defined for negative numbers".to_string(),
        ));
    }
    if n > FACTORIAL_OVERFLOW_THRESHOLD {
        return Err(MathError::Overflow(format!(
            "Factorial of {} exceeds the representable range (limit is {})",
            n, FACTORIAL_OVERFLOW_THRESHOLD
        )));
    }

    let mut result = BigUint::one();
    for i in 2..=n as u64 {
        result *= i;
    }
    Ok(result)
}
