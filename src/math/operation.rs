//! Operation Handlers
//!
//! Each operation pairs a validator with a pure computation behind the
//! [`Operation`] trait, so new operations can be registered without touching
//! the executor.

use serde_json::{Map, Value};

use crate::error::{MathError, ServiceError};
use crate::math::functions::{self, FACTORIAL_OVERFLOW_THRESHOLD};
use crate::math::{Arg, Number};

// == Bounds ==
/// Largest accepted |base| for power
pub const MAX_POWER_BASE: f64 = 1000.0;
/// Largest accepted |exponent| for power
pub const MAX_POWER_EXPONENT: f64 = 1000.0;
/// Largest accepted n for fibonacci
pub const MAX_FIBONACCI_N: i64 = 1000;
/// Largest accepted n for factorial
pub const MAX_FACTORIAL_N: i64 = FACTORIAL_OVERFLOW_THRESHOLD;

// == Operation Args ==
/// Named arguments in the order the operation declares them.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationArgs {
    values: Vec<(&'static str, Arg)>,
}

impl OperationArgs {
    /// Parses a JSON object against the declared parameter names.
    ///
    /// Every declared parameter must be present and numeric; undeclared
    /// fields are ignored. All problems are reported together.
    pub fn parse(
        operation: &str,
        params: &'static [&'static str],
        input: &Value,
    ) -> Result<Self, ServiceError> {
        let empty = Map::new();
        let object = match input {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => {
                return Err(ServiceError::validation(
                    operation,
                    "Request body must be a JSON object",
                ))
            }
        };

        let mut details = Vec::new();
        let mut values = Vec::with_capacity(params.len());

        for &name in params {
            match object.get(name) {
                None => details.push(format!("{}: field required", name)),
                Some(raw) => match Arg::from_json(raw) {
                    Some(arg) => values.push((name, arg)),
                    None => details.push(format!("{}: must be a number (got {})", name, raw)),
                },
            }
        }

        if details.is_empty() {
            Ok(Self { values })
        } else {
            Err(ServiceError::Validation {
                operation: Some(operation.to_string()),
                message: "Invalid input data".to_string(),
                details,
            })
        }
    }

    /// Builds arguments directly, bypassing JSON parsing.
    pub fn from_pairs(values: Vec<(&'static str, Arg)>) -> Self {
        Self { values }
    }

    /// Rewrites a whole-number float argument as an integer, so `5.0` and
    /// `5` share one cache key.
    fn normalize_whole(mut self, name: &str) -> Self {
        for (param, arg) in self.values.iter_mut() {
            if *param == name {
                if let (Arg::Float(_), Some(i)) = (*arg, arg.as_whole()) {
                    *arg = Arg::Int(i);
                }
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Arg> {
        self.values
            .iter()
            .find(|(param, _)| *param == name)
            .map(|(_, arg)| *arg)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Arg)> + '_ {
        self.values.iter().copied()
    }

    /// JSON object view used for error context and request records.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(name, arg)| (name.to_string(), arg.to_json()))
            .collect();
        Value::Object(map)
    }

    fn require(&self, operation: &str, name: &str) -> Result<Arg, ServiceError> {
        self.get(name)
            .ok_or_else(|| ServiceError::validation(operation, format!("{}: field required", name)))
    }

    /// Reads a non-negative integer argument bounded by `max`.
    fn require_count(&self, operation: &str, name: &str, max: i64) -> Result<i64, ServiceError> {
        let arg = self.require(operation, name)?;
        let n = arg.as_whole().ok_or_else(|| {
            ServiceError::validation(operation, format!("{}: must be an integer", name))
        })?;
        if n < 0 {
            return Err(ServiceError::Domain {
                operation: operation.to_string(),
                message: format!("{} is not defined for negative numbers", capitalize(operation)),
                input: self.to_json(),
            });
        }
        if n > max {
            return Err(ServiceError::validation(
                operation,
                format!("{}: must be less than or equal to {}", name, max),
            ));
        }
        Ok(n)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// == Operation Trait ==
/// A cacheable pure operation with its own argument validator.
pub trait Operation: Send + Sync {
    /// Name used for routing, cache keys and statistics.
    fn name(&self) -> &'static str;

    /// Declared parameter names, in canonical order.
    fn params(&self) -> &'static [&'static str];

    /// Checks argument domain and bounds before any cache interaction.
    fn validate(&self, args: &OperationArgs) -> Result<(), ServiceError>;

    /// Runs the computation. Must be deterministic.
    fn compute(&self, args: &OperationArgs) -> Result<Number, MathError>;

    /// Parses a JSON body into arguments for this operation.
    fn parse_args(&self, input: &Value) -> Result<OperationArgs, ServiceError> {
        OperationArgs::parse(self.name(), self.params(), input)
    }
}

// == Power ==
#[derive(Debug, Default, Clone, Copy)]
pub struct PowerOperation;

impl Operation for PowerOperation {
    fn name(&self) -> &'static str {
        "power"
    }

    fn params(&self) -> &'static [&'static str] {
        &["base", "exponent"]
    }

    fn validate(&self, args: &OperationArgs) -> Result<(), ServiceError> {
        let base = args.require(self.name(), "base")?.as_f64();
        let exponent = args.require(self.name(), "exponent")?.as_f64();

        let mut details = Vec::new();
        if !base.is_finite() || base.abs() > MAX_POWER_BASE {
            details.push(format!("base: absolute value must not exceed {}", MAX_POWER_BASE));
        }
        if !exponent.is_finite() || exponent.abs() > MAX_POWER_EXPONENT {
            details.push(format!(
                "exponent: absolute value must not exceed {}",
                MAX_POWER_EXPONENT
            ));
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation {
                operation: Some(self.name().to_string()),
                message: "Invalid input data".to_string(),
                details,
            })
        }
    }

    fn compute(&self, args: &OperationArgs) -> Result<Number, MathError> {
        let base = args.get("base").unwrap_or(Arg::Int(0));
        let exponent = args.get("exponent").unwrap_or(Arg::Int(0));
        functions::power(base, exponent)
    }
}

// == Fibonacci ==
#[derive(Debug, Default, Clone, Copy)]
pub struct FibonacciOperation;

impl Operation for FibonacciOperation {
    fn name(&self) -> &'static str {
        "fibonacci"
    }

    fn params(&self) -> &'static [&'static str] {
        &["n"]
    }

    fn parse_args(&self, input: &Value) -> Result<OperationArgs, ServiceError> {
        OperationArgs::parse(self.name(), self.params(), input)
            .map(|args| args.normalize_whole("n"))
    }

    fn validate(&self, args: &OperationArgs) -> Result<(), ServiceError> {
        args.require_count(self.name(), "n", MAX_FIBONACCI_N)
            .map(|_| ())
    }

    fn compute(&self, args: &OperationArgs) -> Result<Number, MathError> {
        let n = args.get("n").and_then(|a| a.as_whole()).unwrap_or(-1);
        functions::fibonacci(n).map(Number::from)
    }
}

// == Factorial ==
#[derive(Debug, Default, Clone, Copy)]
pub struct FactorialOperation;

impl Operation for FactorialOperation {
    fn name(&self) -> &'static str {
        "factorial"
    }

    fn params(&self) -> &'static [&'static str] {
        &["n"]
    }

    fn parse_args(&self, input: &Value) -> Result<OperationArgs, ServiceError> {
        OperationArgs::parse(self.name(), self.params(), input)
            .map(|args| args.normalize_whole("n"))
    }

    fn validate(&self, args: &OperationArgs) -> Result<(), ServiceError> {
        args.require_count(self.name(), "n", MAX_FACTORIAL_N)
            .map(|_| ())
    }

    fn compute(&self, args: &OperationArgs) -> Result<Number, MathError> {
        let n = args.get("n").and_then(|a| a.as_whole()).unwrap_or(-1);
        functions::factorial(n).map(Number::from)
    }
}
