//! Operation Registry
//!
//! Maps operation names to their handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::math::operation::{FactorialOperation, FibonacciOperation, Operation, PowerOperation};

/// Name-addressed set of registered operations.
#[derive(Clone, Default)]
pub struct OperationRegistry {
    operations: HashMap<&'static str, Arc<dyn Operation>>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with power, fibonacci and factorial.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(PowerOperation);
        registry.register(FibonacciOperation);
        registry.register(FactorialOperation);
        registry
    }

    /// Adds an operation, replacing any previous one with the same name.
    pub fn register<O: Operation + 'static>(&mut self, operation: O) {
        self.operations.insert(operation.name(), Arc::new(operation));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.operations.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operations.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.names())
            .finish()
    }
}
