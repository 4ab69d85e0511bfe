//! Crate-level error aggregate.
//!
//! Each stage owns its error type (lexing/parsing, validation, evaluation);
//! [`Error`] is what the public entry points return so a caller can tell the
//! outcomes apart without string matching.

use crate::interpreter::errors::{AssertionFailure, RuntimeError};
use crate::parser::ast::SourceLocation;
use crate::parser::parser::ParseError;
use crate::semantic::errors::CompileError;
use thiserror::Error;

/// An invariant of the compiler or interpreter was broken.
///
/// Never caused by a well-formed or ill-formed user program alone: either
/// the validation pass let something through it should have rejected, or an
/// evaluator reached a state the validated tree cannot produce.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Internal compiler error: {message}")]
pub struct InternalCompilerError {
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl InternalCompilerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error(transparent)]
    Internal(#[from] InternalCompilerError),
}

impl Error {
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal(_))
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::Assertion(_))
    }

    /// Position the error points at, if it has one.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::Parse(e) => Some(e.location),
            Error::Compile(e) => Some(e.location),
            Error::Runtime(e) => e.location(),
            Error::Assertion(e) => Some(e.location),
            Error::Internal(e) => e.location,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
