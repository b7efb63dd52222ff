//! Math Module
//!
//! Pure computation functions and the registry of cacheable operations.

pub mod functions;
mod number;
pub mod operation;
mod registry;

pub use number::{Arg, Number};
pub use operation::{Operation, OperationArgs};
pub use registry::OperationRegistry;
