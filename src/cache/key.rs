//! Cache Key Module
//!
//! Deterministic fingerprints of an operation and its arguments.

use std::fmt;

use crate::math::OperationArgs;

// == Cache Key ==
/// Canonical `operation(name=value,...)` string.
///
/// Argument order and numeric kind both take part in equality:
/// `power(base=2,exponent=10)` and `power(base=2.0,exponent=10)` differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(operation: &str, args: &OperationArgs) -> Self {
        let rendered: Vec<String> = args
            .iter()
            .map(|(name, arg)| format!("{}={}", name, arg))
            .collect();
        Self(format!("{}({})", operation, rendered.join(",")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Operation name encoded in this key.
    pub fn operation(&self) -> &str {
        operation_of(&self.0).unwrap_or(&self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Utility Functions ==
/// Extracts the operation prefix of a raw key, if it has one.
pub fn operation_of(key: &str) -> Option<&str> {
    key.split_once('(').map(|(operation, _)| operation)
}
