//! Runtime error types for the interpreter
//!
//! [`RuntimeError`] covers failures a validated program can still hit while
//! running. A failed `assert` is reported separately as [`AssertionFailure`].

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Array or string index outside `0..len`
    #[error("Index {index} out of bounds for length {len} at {location}")]
    IndexOutOfBounds {
        index: i128,
        len: usize,
        location: SourceLocation,
    },

    /// Integer or float division / modulo by zero
    #[error("Division by zero in '{operation}' at {location}")]
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    /// Arithmetic result does not fit the operation's type
    #[error("Integer overflow in '{operation}' ({ty}) at {location}")]
    IntegerOverflow {
        operation: String,
        ty: String,
        location: SourceLocation,
    },

    /// Call depth exceeded the interpreter limit
    #[error("Maximum call depth of {limit} exceeded calling '{function}' at {location}")]
    StackOverflow {
        function: String,
        limit: usize,
        location: SourceLocation,
    },

    /// A function with a return type finished without returning a value
    #[error("Function '{function}' ended without returning a value at {location}")]
    MissingReturnValue {
        function: String,
        location: SourceLocation,
    },

    #[error("No main() function found")]
    NoMainFunction,

    #[error("main() must not take parameters at {location}")]
    InvalidMainSignature { location: SourceLocation },
}

impl RuntimeError {
    /// Get the location of the error, if available
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            RuntimeError::IndexOutOfBounds { location, .. }
            | RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::IntegerOverflow { location, .. }
            | RuntimeError::StackOverflow { location, .. }
            | RuntimeError::MissingReturnValue { location, .. }
            | RuntimeError::InvalidMainSignature { location } => Some(*location),
            RuntimeError::NoMainFunction => None,
        }
    }
}

/// `assert(false)` was executed
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Assertion failed at {location}")]
pub struct AssertionFailure {
    pub location: SourceLocation,
}
